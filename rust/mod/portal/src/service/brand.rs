use brandhub_core::{ServiceError, Source};

use crate::model::BrandProfile;
use super::PortalService;

impl PortalService {
    /// Every brand profile, configured overrides taking precedence over the
    /// built-in ones.
    pub fn brands(&self) -> Vec<BrandProfile> {
        Source::ALL.iter().map(|s| self.profile_for(*s)).collect()
    }

    pub fn brand(&self, source: &str) -> Result<BrandProfile, ServiceError> {
        let source: Source = source
            .parse()
            .map_err(|_| ServiceError::NotFound(format!("brand {}", source)))?;
        Ok(self.profile_for(source))
    }

    fn profile_for(&self, source: Source) -> BrandProfile {
        self.config
            .brands
            .iter()
            .find(|b| b.source == source)
            .cloned()
            .unwrap_or_else(|| BrandProfile::builtin(source))
    }
}
