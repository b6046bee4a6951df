//! 分析流程 - 流程层
//!
//! 核心职责：定义"一次分析运行"的完整状态机
//!
//! 状态：`Idle → Running → Idle`（成功 / 部分成功 / 整体失败）。
//! 没有重试，没有取消：一旦进入 Running 就跑到结束或抛错。
//!
//! 运行步骤：
//! 1. 守卫：必须"有内容"且没有运行中的分析
//! 2. 批量通道：存在文本段时先一次性提交全部文本；批量失败立即终止
//!    整次运行，不再提交任何文件
//! 3. 逐项通道：按列表顺序串行提交每个文件，每次调用必然落一行结果
//!    （成功或兜底），文件 N 的失败不会阻塞文件 N+1
//! 4. 汇总：批量结果在前（按响应顺序），文件结果在后（按列表顺序），
//!    整体替换会话的结果列表——这个顺序是展示与导出的契约

use chrono::Duration;
use tracing::{error, info};

use crate::clients::AnalysisApi;
use crate::config::Config;
use crate::error::{AppError, AppResult, SessionError};
use crate::models::{AnalysisResult, SessionState};
use crate::utils::logging::truncate_text;

/// 一次分析运行的结局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 运行完成，结果已替换进会话
    Completed {
        /// 结果总数（文本段 + 文件）
        total: usize,
        /// 其中兜底行的数量
        failures: usize,
    },
    /// 守卫拒绝（无内容或已在运行），会话未被修改
    Rejected,
}

/// 分析流程
///
/// - 编排一次完整的分析运行
/// - 只依赖 [`AnalysisApi`] 能力，不关心传输细节
/// - 是会话状态在运行期间的唯一写者
pub struct AnalyzeFlow<A> {
    api: A,
    error_ttl: Duration,
    success_ttl: Duration,
    verbose_logging: bool,
}

impl<A: AnalysisApi> AnalyzeFlow<A> {
    /// 创建新的分析流程
    pub fn new(api: A, config: &Config) -> Self {
        Self {
            api,
            error_ttl: Duration::seconds(config.error_message_secs as i64),
            success_ttl: Duration::seconds(config.success_message_secs as i64),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 执行一次分析运行
    ///
    /// # 返回
    /// - `Ok(Completed)`: 结果已写入会话，并发出成功提示
    /// - `Ok(Rejected)`: 守卫拒绝，错误提示已写入会话
    /// - `Err(_)`: 整体失败（批量通道失败或结果为空），错误提示已写入会话
    pub async fn run(&self, session: &mut SessionState) -> AppResult<RunOutcome> {
        // ========== 守卫 ==========
        if session.running {
            session.set_error("Análise já em andamento.", self.error_ttl);
            return Ok(RunOutcome::Rejected);
        }

        let texts = session.text_items();
        if texts.is_empty() && session.files.is_empty() {
            session.set_error(
                "Cole um texto ou adicione arquivos antes de analisar.",
                self.error_ttl,
            );
            return Ok(RunOutcome::Rejected);
        }

        // ========== Running ==========
        session.running = true;
        let outcome = self.run_channels(&*session, texts).await;
        session.running = false;

        // ========== 收尾 ==========
        match outcome {
            Ok(results) if results.is_empty() => {
                // 守卫已排除无内容的情况，这里只是防御
                session.set_error("Nenhum item válido para analisar.", self.error_ttl);
                Err(AppError::Session(SessionError::EmptyResults))
            }
            Ok(results) => {
                let total = results.len();
                let failures = results
                    .iter()
                    .filter(|r| r.is_failure_placeholder())
                    .count();

                session.replace_results(results);
                session.set_success(
                    format!("Análise concluída: {} itens.", total),
                    self.success_ttl,
                );

                Ok(RunOutcome::Completed { total, failures })
            }
            Err(e) => {
                error!("❌ 分析运行整体失败: {}", e);
                session.set_error(e.user_detail(), self.error_ttl);
                Err(e)
            }
        }
    }

    /// 两条通道的提交逻辑
    ///
    /// 批量失败用 `?` 直接上抛，此时文件循环尚未开始
    async fn run_channels(
        &self,
        session: &SessionState,
        texts: Vec<String>,
    ) -> AppResult<Vec<AnalysisResult>> {
        let mut acc = Vec::with_capacity(texts.len() + session.files.len());

        // ========== 通道 1: 文本批量 ==========
        if !texts.is_empty() {
            info!("📨 批量提交 {} 段文本...", texts.len());
            if self.verbose_logging {
                for (index, text) in texts.iter().enumerate() {
                    info!("  [{}] {}", index + 1, truncate_text(text, 40));
                }
            }

            let batch = self.api.submit_batch(&texts).await?;
            info!("✓ 批量通道返回 {} 条结果", batch.len());
            acc.extend(batch);
        }

        // ========== 通道 2: 文件逐项（严格串行） ==========
        let total_files = session.files.len();
        for (index, file) in session.files.iter().enumerate() {
            info!("📎 提交文件 {}/{}: {}", index + 1, total_files, file.name);
            let result = self.api.submit_file(file).await;
            acc.push(result);
        }

        Ok(acc)
    }
}
