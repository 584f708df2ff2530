mod memory;

pub mod prelude {
    pub use super::memory::*;
}

pub(crate) mod helpers {
    use crate::ObjectRange;

    /// `range` lies inside an object of `size` bytes
    pub fn range_within(size: usize, range: &ObjectRange) -> bool {
        range.start <= range.end && range.end <= size
    }
}
