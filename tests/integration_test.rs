use email_triage_submit::clients::{AnalysisApi, AnalysisClient};
use email_triage_submit::models::analysis::INTENT_FALLBACK;
use email_triage_submit::models::FileItem;
use email_triage_submit::Config;

/// 指向一个没有服务监听的地址
fn unreachable_config() -> Config {
    Config {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_submit_file_converts_transport_error_to_fallback() {
    let client = AnalysisClient::new(&unreachable_config()).expect("创建客户端失败");

    let file = FileItem::new("relatorio.pdf", b"%PDF-1.4".to_vec());
    let result = client.submit_file(&file).await;

    // 网络异常不抛错，转为兜底结果
    assert_eq!(result.id, "relatorio.pdf");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.metadata.intent, INTENT_FALLBACK);
    assert!(result.is_failure_placeholder());
}

#[tokio::test]
async fn test_submit_batch_propagates_transport_error() {
    let client = AnalysisClient::new(&unreachable_config()).expect("创建客户端失败");

    let texts = vec!["Preciso de suporte.".to_string()];
    let result = client.submit_batch(&texts).await;

    // 批量通道整体成败，错误上抛给调用方
    assert!(result.is_err());
}

#[tokio::test]
#[ignore] // 默认忽略，需要后端在线：cargo test -- --ignored
async fn test_health_probe() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = AnalysisClient::new(&config).expect("创建客户端失败");

    let health = client.health().await.expect("健康检查失败");

    println!("服务状态: {}, 模型: {}", health.status, health.model);
    assert_eq!(health.status, "ok");
}

#[tokio::test]
#[ignore]
async fn test_submit_single_text() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = AnalysisClient::new(&config).expect("创建客户端失败");

    let result = client
        .submit_text("Poderiam informar o status do chamado 12345?")
        .await
        .expect("文本提交失败");

    println!("分类: {} ({:.2})", result.category, result.confidence);
    println!("建议回复: {}", result.suggested_reply);
    assert!(!result.category.is_empty());
    assert!((0.0..=1.0).contains(&result.confidence));
}

#[tokio::test]
#[ignore]
async fn test_submit_batch_roundtrip() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = AnalysisClient::new(&config).expect("创建客户端失败");

    let texts = vec![
        "Estou com erro no sistema e preciso de suporte urgente.".to_string(),
        "Feliz Natal para toda a equipe!".to_string(),
    ];

    let results = client.submit_batch(&texts).await.expect("批量提交失败");

    println!("返回 {} 条结果", results.len());
    for result in &results {
        println!("  [{}] {} ({:.2})", result.id, result.category, result.confidence);
    }
    assert_eq!(results.len(), texts.len());
}

#[tokio::test]
#[ignore]
async fn test_submit_file_roundtrip() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::from_env();
    let client = AnalysisClient::new(&config).expect("创建客户端失败");

    let file = FileItem::new(
        "pedido.txt",
        "Segue em anexo o contrato para validação, por favor confirmar recebimento."
            .as_bytes()
            .to_vec(),
    );

    let result = client.submit_file(&file).await;

    println!("分类: {} ({:.2})", result.category, result.confidence);
    // id 一律以本地文件名为准
    assert_eq!(result.id, "pedido.txt");
}
