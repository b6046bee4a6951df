//! 会话状态
//!
//! 全局唯一的可变状态，只被校验器、分析流程和显式重置操作修改。
//! 单线程事件驱动模型下没有并发写者，状态转移顺序由调度顺序保证。

use chrono::{DateTime, Duration, Local};

use crate::models::{AnalysisResult, FileItem};
use crate::services::segmenter;

/// 瞬态提示的类别
///
/// 两类提示互相抢占：新的错误会清掉未过期的成功提示，反之亦然
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Error,
    Success,
}

/// 瞬态提示消息，到期自动清除
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    /// 过期时刻，tick 时清除
    pub expires_at: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            kind,
            text: text.into(),
            expires_at: Local::now() + ttl,
        }
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        now >= self.expires_at
    }
}

/// 会话状态
///
/// 不变式："有内容" 当且仅当存在至少一个非空文本段或至少一个文件；
/// 分析操作只在有内容且没有分析在进行时可用
#[derive(Debug, Default)]
pub struct SessionState {
    /// 粘贴的原始文本缓冲区
    pub raw_text: String,
    /// 已接收的上传文件，按加入顺序排列
    pub files: Vec<FileItem>,
    /// 上一次分析的结果列表，每次运行整体替换
    pub results: Vec<AnalysisResult>,
    /// 当前瞬态提示
    pub status: Option<StatusMessage>,
    /// 是否有分析在进行中
    pub running: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw_text(&mut self, raw: impl Into<String>) {
        self.raw_text = raw.into();
    }

    /// 文本段列表
    ///
    /// 每次访问都从原始缓冲区重新计算，文本段没有独立身份
    pub fn text_items(&self) -> Vec<String> {
        segmenter::segment(&self.raw_text)
    }

    /// "有内容" 不变式
    pub fn has_content(&self) -> bool {
        !self.files.is_empty() || !self.text_items().is_empty()
    }

    /// 分析操作是否可用
    pub fn can_analyze(&self) -> bool {
        self.has_content() && !self.running
    }

    /// 按名称移除文件
    ///
    /// # 返回
    /// 返回是否移除了文件
    pub fn remove_file(&mut self, name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.name != name);
        self.files.len() != before
    }

    /// 整体替换结果列表
    pub fn replace_results(&mut self, results: Vec<AnalysisResult>) {
        self.results = results;
    }

    /// 设置错误提示（抢占现有提示）
    pub fn set_error(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMessage::new(StatusKind::Error, text, ttl));
    }

    /// 设置成功提示（抢占现有提示）
    pub fn set_success(&mut self, text: impl Into<String>, ttl: Duration) {
        self.status = Some(StatusMessage::new(StatusKind::Success, text, ttl));
    }

    /// 清除已过期的提示
    pub fn tick(&mut self, now: DateTime<Local>) {
        if let Some(status) = &self.status {
            if status.is_expired(now) {
                self.status = None;
            }
        }
    }

    /// 重置会话：清空缓冲区、文件、结果和提示
    pub fn reset(&mut self) {
        self.raw_text.clear();
        self.files.clear();
        self.results.clear();
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_content_requires_text_or_file() {
        let mut session = SessionState::new();
        assert!(!session.has_content());

        // 仅空白文本不算内容
        session.set_raw_text("   \n\n  ");
        assert!(!session.has_content());

        session.set_raw_text("Preciso de suporte.");
        assert!(session.has_content());

        session.set_raw_text("");
        session.files.push(FileItem::new("a.txt", vec![1]));
        assert!(session.has_content());
    }

    #[test]
    fn test_can_analyze_disabled_while_running() {
        let mut session = SessionState::new();
        session.set_raw_text("Olá");
        assert!(session.can_analyze());

        session.running = true;
        assert!(!session.can_analyze());
    }

    #[test]
    fn test_status_preemption() {
        let mut session = SessionState::new();
        session.set_success("ok", Duration::seconds(4));
        session.set_error("falhou", Duration::seconds(8));

        let status = session.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "falhou");

        session.set_success("ok de novo", Duration::seconds(4));
        assert_eq!(session.status.as_ref().unwrap().kind, StatusKind::Success);
    }

    #[test]
    fn test_tick_clears_expired_status() {
        let mut session = SessionState::new();
        session.set_error("falhou", Duration::seconds(8));

        session.tick(Local::now());
        assert!(session.status.is_some());

        session.tick(Local::now() + Duration::seconds(9));
        assert!(session.status.is_none());
    }

    #[test]
    fn test_remove_file_by_name() {
        let mut session = SessionState::new();
        session.files.push(FileItem::new("a.txt", vec![]));
        session.files.push(FileItem::new("b.pdf", vec![]));

        assert!(session.remove_file("a.txt"));
        assert!(!session.remove_file("a.txt"));
        assert_eq!(session.files.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut session = SessionState::new();
        session.set_raw_text("texto");
        session.files.push(FileItem::new("a.txt", vec![]));
        session.set_error("falhou", Duration::seconds(8));

        session.reset();

        assert!(session.raw_text.is_empty());
        assert!(session.files.is_empty());
        assert!(session.results.is_empty());
        assert!(session.status.is_none());
    }
}
