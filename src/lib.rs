//! # Email Triage Submit
//!
//! 一个把本地邮件素材提交给远端分析服务的客户端编排器
//!
//! 输入是两类异构素材：粘贴的原始文本缓冲区（按空行或 `---` 分隔为多段）
//! 和待上传的文件（.pdf / .txt）。程序把它们统一提交给远端分析服务，
//! 容忍单个文件的失败，最终汇总为一份有序的分类结果并导出 CSV。
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 模型层（Models）
//! - `models/` - 会话状态与数据记录
//! - `SessionState` - 唯一的可变会话状态，只被校验器 / 流程层 / 重置操作修改
//! - `AnalysisResult` - 远端返回或本地兜底合成的单行结果
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，不关心流程
//! - `segmenter` - 文本分段能力（纯函数）
//! - `validator` - 文件准入校验能力
//! - `ResultExporter` - 写 CSV 能力
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - 封装远端分析服务的两种调用形态
//! - 批量通道：一次 JSON 请求提交全部文本，整体成败
//! - 逐项通道：每个文件一次 multipart 请求，失败转为兜底结果
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一次分析"的完整状态机
//! - `AnalyzeFlow` - 守卫 → 批量通道 → 顺序逐文件 → 汇总替换
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/` - 应用生命周期：加载输入、驱动流程、导出、统计

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{AnalysisApi, AnalysisClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{AnalysisResult, FileItem, SessionState, StatusKind, StatusMessage};
pub use orchestrator::App;
pub use services::ResultExporter;
pub use workflow::{AnalyzeFlow, RunOutcome};
