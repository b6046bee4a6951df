//! 应用编排器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责一次完整分析运行的调度和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、构建 HTTP 客户端、探测服务健康
//! 2. **输入加载**：读取粘贴缓冲区文件，扫描上传目录
//! 3. **准入校验**：委托 validator 过滤候选文件
//! 4. **流程驱动**：委托 AnalyzeFlow 执行分析状态机
//! 5. **结果导出**：委托 ResultExporter 写出 CSV 工件
//! 6. **全局统计**：汇总整次运行的成败

use anyhow::{Context, Result};
use chrono::Duration;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

use crate::clients::AnalysisClient;
use crate::config::Config;
use crate::error::AppError;
use crate::models::{load_candidate_files, SessionState, StatusKind, StatusMessage};
use crate::services::{validator, ResultExporter};
use crate::workflow::{AnalyzeFlow, RunOutcome};

/// 应用主结构
pub struct App {
    config: Config,
    session: SessionState,
    flow: AnalyzeFlow<AnalysisClient>,
    exporter: ResultExporter,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(&config);

        let client = AnalysisClient::new(&config)?;

        // 启动时探测服务健康状态
        match client.health().await {
            Ok(health) => {
                info!("✓ 分析服务在线 ({})，模型: {}", health.status, health.model)
            }
            Err(e) => warn!("⚠️ 分析服务健康检查失败: {}", e),
        }

        let flow = AnalyzeFlow::new(client, &config);
        let exporter = ResultExporter::with_path(config.export_folder.clone());

        Ok(Self {
            config,
            session: SessionState::new(),
            flow,
            exporter,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(mut self) -> Result<()> {
        // 加载粘贴文本缓冲区
        let raw_text = load_raw_text(&self.config.input_text_file).await?;
        self.session.set_raw_text(raw_text);

        // 加载并校验候选文件
        info!("\n📁 正在扫描上传目录: {}", self.config.uploads_folder);
        let candidates = load_candidate_files(&self.config.uploads_folder).await?;
        let outcome = validator::add_files(&mut self.session, candidates);
        if let Some(warning) = outcome.warning() {
            warn!("⚠️ {}", warning);
            self.session.set_error(warning, self.error_ttl());
        }

        log_inputs_loaded(
            self.session.text_items().len(),
            self.session.files.len(),
            outcome.rejected.len(),
        );

        if !self.session.has_content() {
            warn!("⚠️ 没有可分析的内容，程序结束");
            return Ok(());
        }

        // 执行分析
        let run_result = self.flow.run(&mut self.session).await;

        // 导出工件（仅在运行完成后；导出失败不影响会话状态）
        let export_path = match &run_result {
            Ok(RunOutcome::Completed { .. }) => match self.exporter.export(&self.session.results) {
                Ok(path) => path,
                Err(e) => {
                    warn!("⚠️ 导出失败: {}", e);
                    self.session
                        .set_error(format!("Falha ao exportar o CSV: {}", e), self.error_ttl());
                    None
                }
            },
            _ => None,
        };

        if let Some(path) = &export_path {
            info!("💾 结果已导出: {}", path.display());
        }

        // 输出当前提示与最终统计
        if let Some(status) = &self.session.status {
            log_status(status);
        }
        print_final_stats(&run_result, &self.config)?;

        Ok(())
    }

    fn error_ttl(&self) -> Duration {
        Duration::seconds(self.config.error_message_secs as i64)
    }
}

/// 读取粘贴文本缓冲区，文件不存在视为没有粘贴文本
async fn load_raw_text(path: &str) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("未找到文本输入文件 {}，视为无粘贴文本", path);
            Ok(String::new())
        }
        Err(e) => Err(e).with_context(|| format!("无法读取文本输入文件: {}", path)),
    }
}

// ========== 日志辅助函数 ==========

fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n邮件分析日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 邮件分类提交模式");
    info!("🌐 分析服务: {}", config.api_base_url);
    info!("{}", "=".repeat(60));
}

fn log_inputs_loaded(texts: usize, files: usize, rejected: usize) {
    info!("✓ 找到 {} 段文本、{} 个文件", texts, files);
    if rejected > 0 {
        info!("🚫 另有 {} 个文件被拒绝", rejected);
    }
    info!("💡 文本走批量通道，文件按顺序逐个提交\n");
}

fn log_status(status: &StatusMessage) {
    match status.kind {
        StatusKind::Error => error!("❗ {}", status.text),
        StatusKind::Success => info!("✅ {}", status.text),
    }
}

fn print_final_stats(run_result: &Result<RunOutcome, AppError>, config: &Config) -> Result<()> {
    info!("\n{}", "=".repeat(60));
    info!("📊 运行结束统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));

    let summary = match run_result {
        Ok(RunOutcome::Completed { total, failures }) => {
            info!("✅ 成功: {}/{}", total - failures, total);
            info!("❌ 失败(兜底): {}", failures);
            format!("完成: {} 条结果，{} 条兜底", total, failures)
        }
        Ok(RunOutcome::Rejected) => {
            info!("🚫 运行被守卫拒绝");
            "运行被守卫拒绝".to_string()
        }
        Err(e) => {
            info!("❌ 整体失败: {}", e);
            format!("整体失败: {}", e)
        }
    };
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", config.output_log_file);

    append_to_log_file(&config.output_log_file, &summary)?;

    Ok(())
}

fn append_to_log_file(path: &str, summary: &str) -> Result<()> {
    if !Path::new(path).exists() {
        return Ok(());
    }
    let mut file = fs::OpenOptions::new().append(true).open(path)?;
    writeln!(file, "{}", summary)?;
    Ok(())
}
