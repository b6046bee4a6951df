//! 分析结果模型
//!
//! 远端服务返回的动态 JSON 在这里收敛为固定形状的记录：
//! 缺失字段在反序列化时落到文档化的默认值，越界取值在 `normalized` 中收口。

use serde::{Deserialize, Serialize};

/// 分类类别：需要行动的邮件
pub const CATEGORY_PRODUTIVO: &str = "Produtivo";
/// 分类类别：无需行动的邮件（也是兜底类别）
pub const CATEGORY_IMPRODUTIVO: &str = "Improdutivo";
/// 兜底意图标签
pub const INTENT_FALLBACK: &str = "outros";
/// 兜底结果的回复前缀，后接底层错误详情
pub const FALLBACK_REPLY_PREFIX: &str = "Erro ao processar:";

/// 远端服务 schema 中的规范意图标签
pub static INTENT_LABELS: phf::Set<&'static str> = phf::phf_set! {
    "status",
    "anexo",
    "suporte",
    "dúvida",
    "felicitações",
    "agradecimento",
    "outros",
};

/// 单条分析结果
///
/// 来源有两种：远端服务返回，或单个文件提交失败时本地合成的兜底行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 来源标识：文本段的合成标签，或文件名
    #[serde(default)]
    pub id: String,
    /// 分类类别（Produtivo / Improdutivo）
    #[serde(default = "default_category")]
    pub category: String,
    /// 置信度，取值范围 [0, 1]
    #[serde(default)]
    pub confidence: f64,
    /// 建议回复（PT-BR）
    #[serde(default)]
    pub suggested_reply: String,
    #[serde(default)]
    pub metadata: AnalysisMetadata,
}

/// 结果附加信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// 意图标签，取值见 [`INTENT_LABELS`]
    #[serde(default = "default_intent")]
    pub intent: String,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            intent: INTENT_FALLBACK.to_string(),
        }
    }
}

fn default_category() -> String {
    CATEGORY_IMPRODUTIVO.to_string()
}

fn default_intent() -> String {
    INTENT_FALLBACK.to_string()
}

impl AnalysisResult {
    /// 合成兜底结果
    ///
    /// 单个文件提交失败（非成功响应或网络异常）时调用，
    /// 保证"每个提交的文件都有且只有一行结果"
    ///
    /// # 参数
    /// - `id`: 文件名
    /// - `detail`: 底层错误详情，会嵌入建议回复文案
    pub fn fallback(id: impl Into<String>, detail: &str) -> Self {
        Self {
            id: id.into(),
            category: CATEGORY_IMPRODUTIVO.to_string(),
            confidence: 0.0,
            suggested_reply: format!("{} {}", FALLBACK_REPLY_PREFIX, detail),
            metadata: AnalysisMetadata {
                intent: INTENT_FALLBACK.to_string(),
            },
        }
    }

    /// 在 API 边界收口字段取值
    ///
    /// - 未知类别 → Improdutivo
    /// - 未知意图 → outros
    /// - 置信度收敛到 [0, 1]，非有限值归零
    pub fn normalized(mut self) -> Self {
        if self.category != CATEGORY_PRODUTIVO && self.category != CATEGORY_IMPRODUTIVO {
            self.category = CATEGORY_IMPRODUTIVO.to_string();
        }
        if !INTENT_LABELS.contains(self.metadata.intent.as_str()) {
            self.metadata.intent = INTENT_FALLBACK.to_string();
        }
        if !self.confidence.is_finite() {
            self.confidence = 0.0;
        } else {
            self.confidence = self.confidence.clamp(0.0, 1.0);
        }
        self
    }

    /// 判断是否为本地合成的兜底行（仅用于统计展示）
    pub fn is_failure_placeholder(&self) -> bool {
        self.category == CATEGORY_IMPRODUTIVO
            && self.confidence == 0.0
            && self.metadata.intent == INTENT_FALLBACK
            && self.suggested_reply.starts_with(FALLBACK_REPLY_PREFIX)
    }
}
