mod comparator;
mod concurrent_skip_list;
mod height;
mod options;
mod skip_list;

#[cfg(test)]
mod test_utils;

pub mod error;

pub mod prelude {
    pub use crate::comparator::prelude::*;
    pub use crate::concurrent_skip_list::ConcurrentSkipList;
    pub use crate::error::{Error, Result};
    pub use crate::options::{
        DEFAULT_MAX_HEIGHT, MAX_HEIGHT_LIMIT, SkipListOpenOptions, SkipListOptions,
    };
    pub use crate::skip_list::{SkipList, SkipListIter};
}
