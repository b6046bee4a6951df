//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责应用生命周期和一次完整运行的调度，是整个系统的"指挥中心"。
//!
//! ### `app` - 应用编排器
//! - 管理应用生命周期（初始化、运行、收尾）
//! - 启动时探测分析服务健康状态
//! - 加载输入素材（粘贴缓冲区 + 上传目录）
//! - 驱动分析流程并导出 CSV
//! - 输出全局统计信息
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (一次完整运行)
//!     ↓
//! workflow::AnalyzeFlow (分析状态机)
//!     ↓
//! services (能力层：segmenter / validator / exporter)
//!     ↓
//! clients::AnalysisClient (远端分析服务)
//! ```
//!
//! ## 设计原则
//!
//! 1. **单一职责**：编排层只做调度和统计，不做业务判断
//! 2. **向下依赖**：orchestrator → workflow → services / clients
//! 3. **唯一写者**：会话状态只被校验器、流程层和重置操作修改

pub mod app;

// 重新导出主要类型
pub use app::App;
