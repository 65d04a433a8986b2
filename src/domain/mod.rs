//! Domain Layer - 领域层
//!
//! 纯算法与纯状态，无 I/O：
//! - segmenter: 边界感知的文本分割
//! - cursor: 投递位置游标

mod cursor;
mod segmenter;

pub use cursor::SegmentCursor;
pub use segmenter::{
    segment, Segment, SegmentError, SegmentationOptions, DEFAULT_MAX_LENGTH,
    DEFAULT_SPLIT_PATTERN,
};
