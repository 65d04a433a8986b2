//! 文本分割器
//!
//! 纯函数实现：按分割规则扫描文本，在自然断点处切出长度受限的段落。
//! 无 I/O、无失败路径，相同输入总是产生相同输出。

use regex::Regex;
use thiserror::Error;

/// 默认最大段落长度（字符数）
pub const DEFAULT_MAX_LENGTH: usize = 2000;

/// 默认分割规则（句号/感叹号/问号/换行）
pub const DEFAULT_SPLIT_PATTERN: &str = "[。！？\\n]";

/// 分割错误
#[derive(Debug, Error)]
pub enum SegmentError {
    /// 分割规则不是合法的正则表达式
    #[error("无效的分割规则: {0}")]
    InvalidPattern(String),
}

/// 分割后的段落
///
/// `id` 为 0 起始的顺序编号，`content` 已去除首尾空白且非空。
/// 产生后不再变更。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: usize,
    pub content: String,
}

/// 分割配置
///
/// 构造时编译分割规则，非法规则在这里被拒绝，
/// 分割本身不再有失败路径。
#[derive(Debug, Clone)]
pub struct SegmentationOptions {
    /// 最大段落长度（字符数），长度控制是尽力而为：
    /// 单个超长的边界单元不会被从中间切开
    pub max_length: usize,
    boundary: Regex,
}

impl SegmentationOptions {
    /// 创建分割配置
    ///
    /// `max_length` 为 0 时回退到 [`DEFAULT_MAX_LENGTH`]。
    pub fn new(max_length: usize, pattern: &str) -> Result<Self, SegmentError> {
        let boundary =
            Regex::new(pattern).map_err(|e| SegmentError::InvalidPattern(e.to_string()))?;
        let max_length = if max_length == 0 {
            DEFAULT_MAX_LENGTH
        } else {
            max_length
        };
        Ok(Self {
            max_length,
            boundary,
        })
    }

    /// 分割规则的原始文本
    pub fn pattern(&self) -> &str {
        self.boundary.as_str()
    }
}

/// 对文本进行分割
///
/// 从左到右扫描：每次在剩余文本中找下一个边界，把边界（含边界字符）
/// 之前的内容吸收进累积缓冲；缓冲达到 `max_length` 字符后整体切出。
/// 扫描结束后剩余的非空内容作为最后一段切出。
///
/// - 空白段落被静默丢弃，不占用编号
/// - 找不到任何边界时，整个文本（去除首尾空白后）作为单独一段
/// - 所有段落按原文顺序、互不重叠；拼接各段（忽略去除的空白）可还原原文
pub fn segment(text: &str, options: &SegmentationOptions) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut current = String::new();
    let mut current_chars = 0usize;
    let mut next_id = 0usize;

    let mut remaining = text;
    while !remaining.is_empty() {
        match options.boundary.find(remaining) {
            // 空匹配会导致扫描停滞，按无边界处理
            Some(m) if m.end() > 0 => {
                let absorbed = &remaining[..m.end()];
                current.push_str(absorbed);
                current_chars += absorbed.chars().count();
                remaining = &remaining[m.end()..];
            }
            _ => {
                current.push_str(remaining);
                current_chars += remaining.chars().count();
                remaining = "";
            }
        }

        if current_chars >= options.max_length {
            flush(&mut current, &mut next_id, &mut segments);
            current_chars = 0;
        }
    }

    flush(&mut current, &mut next_id, &mut segments);
    segments
}

/// 切出缓冲内容：去除首尾空白，空段丢弃，非空段获得下一个编号
fn flush(buffer: &mut String, next_id: &mut usize, out: &mut Vec<Segment>) {
    let trimmed = buffer.trim();
    if !trimmed.is_empty() {
        out.push(Segment {
            id: *next_id,
            content: trimmed.to_string(),
        });
        *next_id += 1;
    }
    buffer.clear();
}
