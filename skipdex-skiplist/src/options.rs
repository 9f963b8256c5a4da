use std::sync::Arc;

use crate::error::{Error, Result};

pub const DEFAULT_MAX_HEIGHT: usize = 16;

/// Upper bound accepted for [`SkipListOpenOptions::max_height`].
pub const MAX_HEIGHT_LIMIT: usize = 32;

#[derive(Debug, Clone)]
pub struct SkipListOptions {
    pub(crate) max_height: usize,
}

impl SkipListOptions {
    pub fn max_height(&self) -> usize {
        self.max_height
    }
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

#[derive(Debug)]
pub struct SkipListOpenOptions {
    max_height: usize,
}

impl Default for SkipListOpenOptions {
    fn default() -> Self {
        Self {
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

impl SkipListOpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap on the number of levels a node may occupy.
    pub fn max_height(&mut self, height: usize) -> &mut Self {
        self.max_height = height;
        self
    }

    pub fn build(&self) -> Result<Arc<SkipListOptions>> {
        if self.max_height == 0 || self.max_height > MAX_HEIGHT_LIMIT {
            return Err(Error::InvalidOptions(format!(
                "max_height must be in [1, {MAX_HEIGHT_LIMIT}], got {}",
                self.max_height
            )));
        }

        Ok(Arc::new(SkipListOptions {
            max_height: self.max_height,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() -> anyhow::Result<()> {
        let opts = SkipListOpenOptions::new().build()?;
        assert_eq!(opts.max_height(), DEFAULT_MAX_HEIGHT);
        Ok(())
    }

    #[test]
    fn custom_height() -> anyhow::Result<()> {
        let opts = SkipListOpenOptions::new().max_height(4).build()?;
        assert_eq!(opts.max_height(), 4);
        Ok(())
    }

    #[test]
    fn reject_bad_height() {
        assert!(matches!(
            SkipListOpenOptions::new().max_height(0).build(),
            Err(Error::InvalidOptions(_))
        ));
        assert!(matches!(
            SkipListOpenOptions::new()
                .max_height(MAX_HEIGHT_LIMIT + 1)
                .build(),
            Err(Error::InvalidOptions(_))
        ));
    }
}
