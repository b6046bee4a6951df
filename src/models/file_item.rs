//! 上传文件模型与加载

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 一个待上传的文件
///
/// 在当前会话内以文件名作为唯一标识
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    /// 文件名（不含目录）
    pub name: String,
    /// 文件内容
    pub bytes: Vec<u8>,
}

impl FileItem {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 从磁盘路径加载单个文件
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("无法读取文件: {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        Ok(Self { name, bytes })
    }
}

/// 从文件夹中加载所有候选文件
///
/// 不做扩展名过滤，准入校验由 validator 负责。
/// 目录不存在时视为没有候选文件。
pub async fn load_candidate_files(folder_path: &str) -> Result<Vec<FileItem>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        tracing::info!("上传目录不存在，跳过: {}", folder_path);
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_file() {
            paths.push(path);
        }
    }

    // 按文件名排序，保证提交顺序可复现
    paths.sort();

    let mut items = Vec::new();
    for path in paths {
        tracing::info!(
            "正在加载: {}",
            path.file_name().unwrap_or_default().to_string_lossy()
        );

        match FileItem::load(&path).await {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!("加载文件失败 {}: {}", path.display(), e);
            }
        }
    }

    Ok(items)
}
