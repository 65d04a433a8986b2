//! 段落游标
//!
//! 持有分割结果并跟踪投递位置。位置只会单调前进，
//! 仅在 `reset` 替换底层序列时回到 0。

use super::segmenter::Segment;

/// 段落游标
#[derive(Debug, Default)]
pub struct SegmentCursor {
    segments: Vec<Segment>,
    position: usize,
    prompt_prefix: Option<String>,
}

impl SegmentCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// 替换底层段落序列，位置回到 0
    pub fn reset(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
        self.position = 0;
    }

    /// 设置提示词模板（投递时拼接在段落内容之前）
    pub fn set_prompt_prefix(&mut self, prefix: Option<String>) {
        self.prompt_prefix = prefix.filter(|p| !p.is_empty());
    }

    /// 取出下一个段落并前进
    ///
    /// 序列耗尽后返回 `None`，之后的每次调用也都返回 `None`，
    /// 这是调度器识别的终止信号。
    pub fn next(&mut self) -> Option<Segment> {
        let segment = self.segments.get(self.position).cloned()?;
        self.position += 1;
        Some(segment)
    }

    /// 取出下一个段落并前进，返回拼接了提示词前缀的副本
    ///
    /// 底层存储的段落不会被修改。
    pub fn next_with_prefix(&mut self) -> Option<Segment> {
        let segment = self.next()?;
        match &self.prompt_prefix {
            Some(prefix) => Some(Segment {
                id: segment.id,
                content: format!("{}{}", prefix, segment.content),
            }),
            None => Some(segment),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// 尚未投递的段落数
    pub fn remaining(&self) -> usize {
        self.segments.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.segments.len()
    }
}
