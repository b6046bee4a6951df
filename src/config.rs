use serde::Deserialize;

/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 分析服务基础地址
    pub api_base_url: String,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 粘贴文本缓冲区文件
    pub input_text_file: String,
    /// 待上传文件存放目录
    pub uploads_folder: String,
    /// CSV 导出目录
    pub export_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 错误提示的显示时长（秒）
    pub error_message_secs: u64,
    /// 成功提示的显示时长（秒）
    pub success_message_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 30,
            input_text_file: "input.txt".to_string(),
            uploads_folder: "uploads".to_string(),
            export_folder: ".".to_string(),
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            error_message_secs: 8,
            success_message_secs: 4,
        }
    }
}

/// config.toml 的可选覆盖项
///
/// 文件中未出现的字段保持默认值
#[derive(Debug, Default, Deserialize)]
struct ConfigOverlay {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    input_text_file: Option<String>,
    uploads_folder: Option<String>,
    export_folder: Option<String>,
    verbose_logging: Option<bool>,
    output_log_file: Option<String>,
    error_message_secs: Option<u64>,
    success_message_secs: Option<u64>,
}

impl Config {
    /// 加载配置：默认值 ← config.toml ← 环境变量
    pub fn load() -> Self {
        let base = match std::fs::read_to_string("config.toml") {
            Ok(content) => Self::default().apply_toml(&content),
            Err(_) => Self::default(),
        };
        Self::from_env_over(base)
    }

    pub fn from_env() -> Self {
        Self::from_env_over(Self::default())
    }

    fn from_env_over(default: Self) -> Self {
        Self {
            api_base_url: std::env::var("API_BASE_URL").unwrap_or(default.api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            input_text_file: std::env::var("INPUT_TEXT_FILE").unwrap_or(default.input_text_file),
            uploads_folder: std::env::var("UPLOADS_FOLDER").unwrap_or(default.uploads_folder),
            export_folder: std::env::var("EXPORT_FOLDER").unwrap_or(default.export_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            error_message_secs: std::env::var("ERROR_MESSAGE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.error_message_secs),
            success_message_secs: std::env::var("SUCCESS_MESSAGE_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.success_message_secs),
        }
    }

    fn apply_toml(self, content: &str) -> Self {
        let overlay: ConfigOverlay = match toml::from_str(content) {
            Ok(overlay) => overlay,
            Err(e) => {
                tracing::warn!("config.toml 解析失败，忽略: {}", e);
                return self;
            }
        };
        Self {
            api_base_url: overlay.api_base_url.unwrap_or(self.api_base_url),
            request_timeout_secs: overlay.request_timeout_secs.unwrap_or(self.request_timeout_secs),
            input_text_file: overlay.input_text_file.unwrap_or(self.input_text_file),
            uploads_folder: overlay.uploads_folder.unwrap_or(self.uploads_folder),
            export_folder: overlay.export_folder.unwrap_or(self.export_folder),
            verbose_logging: overlay.verbose_logging.unwrap_or(self.verbose_logging),
            output_log_file: overlay.output_log_file.unwrap_or(self.output_log_file),
            error_message_secs: overlay.error_message_secs.unwrap_or(self.error_message_secs),
            success_message_secs: overlay.success_message_secs.unwrap_or(self.success_message_secs),
        }
    }
}
