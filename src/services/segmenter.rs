//! 文本分段服务 - 业务能力层
//!
//! 只负责"把粘贴缓冲区切成独立文本段"能力，纯函数，无副作用。
//!
//! 分隔规则：
//! - 空行（一行或连续多行只含空白）
//! - 整行只有 `---`（两侧允许空白）
//!
//! 切分后逐段 trim，丢弃空段。Windows / Unix 换行等价。

use regex::Regex;
use std::sync::OnceLock;

/// 重新拼接文本段时的规范分隔符
pub const CANONICAL_SEPARATOR: &str = "\n\n";

static SEPARATOR_LINE_RE: OnceLock<Regex> = OnceLock::new();

fn separator_line_re() -> &'static Regex {
    SEPARATOR_LINE_RE.get_or_init(|| {
        Regex::new(r"^[ \t]*---[ \t]*$").expect("分隔行正则不合法")
    })
}

/// 判断一行是否为段落分隔行
fn is_separator_line(line: &str) -> bool {
    line.trim().is_empty() || separator_line_re().is_match(line)
}

/// 把原始缓冲区切分为有序文本段
///
/// 幂等：把结果用 [`CANONICAL_SEPARATOR`] 拼回再切分，得到相同的段序列。
///
/// # 边界情况
/// - 空串或纯空白 → 零段
/// - 没有分隔符 → 恰好一段（整体 trim 后）
pub fn segment(raw: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();

    // str::lines 会去掉行尾的 \r，天然兼容 CRLF
    for line in raw.lines() {
        if is_separator_line(line) {
            flush_segment(&mut items, &mut current);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
        }
    }
    flush_segment(&mut items, &mut current);

    items
}

fn flush_segment(items: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        items.push(trimmed.to_string());
    }
    current.clear();
}
