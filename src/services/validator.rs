//! 输入校验服务 - 业务能力层
//!
//! 只负责"上传文件准入"能力：按扩展名把候选文件分为接受 / 拒绝两类，
//! 接受的按到达顺序追加进会话，被拒绝的汇成一条用户可见的警告。

use tracing::debug;

use crate::models::{FileItem, SessionState};

/// 允许上传的扩展名（不区分大小写）
pub static ALLOWED_EXTENSIONS: phf::Set<&'static str> = phf::phf_set! {
    "pdf",
    "txt",
};

/// 一次批量加入的结果
#[derive(Debug, Default)]
pub struct AddOutcome {
    /// 本次接受的文件数
    pub accepted: usize,
    /// 被拒绝的文件名，按到达顺序
    pub rejected: Vec<String>,
}

impl AddOutcome {
    /// 汇总的用户警告
    ///
    /// 没有拒绝项时返回 None（空批次静默通过）
    pub fn warning(&self) -> Option<String> {
        if self.rejected.is_empty() {
            None
        } else {
            Some(format!(
                "Formato não suportado ou nome duplicado: {}",
                self.rejected.join(", ")
            ))
        }
    }
}

/// 文件名是否带有允许的扩展名
pub fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// 校验并加入一批候选文件
///
/// 接受的文件按到达顺序追加到会话的文件列表；
/// 扩展名不符或与已有文件重名的进入拒绝列表。
/// 空批次是无副作用的空操作。任何输入都不会 panic。
pub fn add_files(session: &mut SessionState, batch: Vec<FileItem>) -> AddOutcome {
    let mut outcome = AddOutcome::default();

    for candidate in batch {
        if !has_allowed_extension(&candidate.name) {
            debug!("拒绝文件（扩展名不符）: {}", candidate.name);
            outcome.rejected.push(candidate.name);
            continue;
        }

        // 文件名是会话内的唯一标识，重名直接拒绝
        if session.files.iter().any(|f| f.name == candidate.name) {
            debug!("拒绝文件（重名）: {}", candidate.name);
            outcome.rejected.push(candidate.name);
            continue;
        }

        session.files.push(candidate);
        outcome.accepted += 1;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> FileItem {
        FileItem::new(name, b"conteudo".to_vec())
    }

    #[test]
    fn test_partition_by_extension() {
        let mut session = SessionState::new();
        let outcome = add_files(
            &mut session,
            vec![file("a.txt"), file("b.pdf"), file("c.docx")],
        );

        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.rejected, vec!["c.docx"]);

        let names: Vec<&str> = session.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.pdf"]);

        let warning = outcome.warning().unwrap();
        assert!(warning.contains("c.docx"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(has_allowed_extension("A.TXT"));
        assert!(has_allowed_extension("b.Pdf"));
        assert!(!has_allowed_extension("c.DOCX"));
        assert!(!has_allowed_extension("sem_extensao"));
    }

    #[test]
    fn test_empty_batch_is_a_silent_noop() {
        let mut session = SessionState::new();
        let outcome = add_files(&mut session, Vec::new());

        assert_eq!(outcome.accepted, 0);
        assert!(outcome.warning().is_none());
        assert!(session.files.is_empty());
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut session = SessionState::new();
        add_files(&mut session, vec![file("a.txt")]);

        let outcome = add_files(&mut session, vec![file("a.txt"), file("b.pdf")]);

        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.rejected, vec!["a.txt"]);
        assert_eq!(session.files.len(), 2);
    }

    #[test]
    fn test_duplicate_within_same_batch() {
        let mut session = SessionState::new();
        let outcome = add_files(&mut session, vec![file("a.txt"), file("a.txt")]);

        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.rejected, vec!["a.txt"]);
    }

    #[test]
    fn test_rejected_names_are_joined_in_one_warning() {
        let mut session = SessionState::new();
        let outcome = add_files(&mut session, vec![file("x.exe"), file("y.docx")]);

        assert_eq!(outcome.warning().unwrap(), "Formato não suportado ou nome duplicado: x.exe, y.docx");
    }
}
