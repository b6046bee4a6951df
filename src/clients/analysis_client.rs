//! 分析服务客户端
//!
//! 封装远端分析服务的两种调用形态，统一为一个结果类型：
//!
//! - **批量通道** `submit_batch`：一次 JSON 请求提交全部文本，整体成败。
//!   非成功响应把响应体的 detail 作为错误抛给调用方，不从失败响应中捞部分结果。
//! - **逐项通道** `submit_file`：每个文件一次 multipart 请求，永不抛错——
//!   非成功响应和网络异常都转为本地合成的兜底结果，保证一个文件的失败
//!   不会中断整次运行。
//!
//! 这种不对称是刻意的契约：文本批量换吞吐（一次调用、粗粒度失败），
//! 文件逐项换隔离（结果数恒等于提交数）。

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{AnalysisResult, FileItem};

/// 批量通道失败且响应体没有 detail 时的兜底文案
const GENERIC_BATCH_DETAIL: &str = "Falha ao analisar os textos.";

/// 远端分析服务的调用能力
///
/// 流程层只依赖这个 trait，测试时可以用桩实现替换真实客户端
#[async_trait]
pub trait AnalysisApi {
    /// 批量提交全部文本段（按分段顺序）
    ///
    /// 整体成败：非成功响应时返回携带服务端 detail 的错误
    async fn submit_batch(&self, texts: &[String]) -> AppResult<Vec<AnalysisResult>>;

    /// 提交单个文件
    ///
    /// 永不失败：任何错误都转为兜底结果返回
    async fn submit_file(&self, file: &FileItem) -> AnalysisResult;
}

/// 分析服务客户端
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

/// 批量请求体
#[derive(serde::Serialize)]
struct BatchRequest<'a> {
    texts: &'a [String],
}

/// 批量响应体
#[derive(Deserialize)]
struct BatchResponse {
    #[serde(default)]
    results: Vec<AnalysisResult>,
}

/// 失败响应体（detail 可能缺失）
#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// /health 响应
#[derive(Debug, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model: String,
}

impl AnalysisClient {
    /// 创建新的分析服务客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 服务健康检查
    ///
    /// # 返回
    /// 返回服务状态和远端模型名
    pub async fn health(&self) -> AppResult<HealthStatus> {
        let endpoint = self.endpoint("/health");
        let resp = self
            .http
            .get(&endpoint)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = extract_detail(resp).await.unwrap_or_default();
            return Err(AppError::api_bad_response(endpoint, status.as_u16(), detail));
        }

        Ok(resp.json::<HealthStatus>().await?)
    }

    /// 提交单段文本（与后端 /api/analyze 的文本形态对齐）
    pub async fn submit_text(&self, text: &str) -> AppResult<AnalysisResult> {
        let endpoint = self.endpoint("/api/analyze");
        debug!("提交文本，长度: {} 字符", text.len());

        let resp = self
            .http
            .post(&endpoint)
            .form(&[("text", text)])
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = extract_detail(resp)
                .await
                .unwrap_or_else(|| "Falha ao analisar o texto.".to_string());
            return Err(AppError::api_bad_response(endpoint, status.as_u16(), detail));
        }

        Ok(resp.json::<AnalysisResult>().await?.normalized())
    }

    /// 单个文件的实际提交逻辑，错误在 submit_file 中统一转兜底
    async fn try_submit_file(&self, file: &FileItem) -> AppResult<AnalysisResult> {
        let endpoint = self.endpoint("/api/analyze");

        let part = multipart::Part::bytes(file.bytes.clone()).file_name(file.name.clone());
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = extract_detail(resp)
                .await
                .unwrap_or_else(|| format!("Falha ao analisar o arquivo {}.", file.name));
            return Err(AppError::api_bad_response(endpoint, status.as_u16(), detail));
        }

        Ok(resp.json::<AnalysisResult>().await?.normalized())
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn submit_batch(&self, texts: &[String]) -> AppResult<Vec<AnalysisResult>> {
        let endpoint = self.endpoint("/api/analyze_batch");
        debug!("批量提交 {} 段文本", texts.len());

        let resp = self
            .http
            .post(&endpoint)
            .json(&BatchRequest { texts })
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(&endpoint, e))?;

        let status = resp.status();
        if !status.is_success() {
            let detail = extract_detail(resp)
                .await
                .unwrap_or_else(|| GENERIC_BATCH_DETAIL.to_string());
            return Err(AppError::api_bad_response(endpoint, status.as_u16(), detail));
        }

        let body: BatchResponse = resp.json().await?;

        // 边界收口：顺序与请求一致，缺失 id 的条目补上合成标签
        let results = body
            .results
            .into_iter()
            .enumerate()
            .map(|(index, result)| {
                let mut result = result.normalized();
                if result.id.is_empty() {
                    result.id = format!("text-{}", index);
                }
                result
            })
            .collect();

        Ok(results)
    }

    async fn submit_file(&self, file: &FileItem) -> AnalysisResult {
        match self.try_submit_file(file).await {
            Ok(mut result) => {
                // id 一律以本地文件名为准，忽略服务端返回的值
                result.id = file.name.clone();
                result
            }
            Err(e) => {
                warn!("文件 {} 提交失败，合成兜底结果: {}", file.name, e);
                AnalysisResult::fallback(&file.name, &e.user_detail())
            }
        }
    }
}

/// 从失败响应中提取 detail 字段
async fn extract_detail(resp: reqwest::Response) -> Option<String> {
    resp.json::<ErrorBody>().await.ok().and_then(|body| body.detail)
}
