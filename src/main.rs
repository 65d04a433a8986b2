//! Segfill - 长文本分段填充演示入口
//!
//! 读取配置并分割输入文本，然后在内存宿主界面上
//! 走一遍完整的投递流程（解析目标 → 写入 → 自动确认 → 定时迭代）。
//!
//! 用法: segfill [文本文件] [站点标识]

use std::sync::Arc;
use std::time::Duration;

use segfill::application::delivery::DeliveryEngineConfig;
use segfill::application::ports::TargetKind;
use segfill::application::RelayService;
use segfill::config::{load_config, print_config};
use segfill::infrastructure::{FakeSurface, InMemoryClipboard, InMemorySettingsStore};

const DEMO_TEXT: &str = "这是第一句演示文本。这是第二句！\n这是换行后的第三句？最后一句没有结尾标点";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},segfill={}", config.log.level, config.log.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Segfill - 长文本分段填充核心");
    print_config(&config);

    let mut args = std::env::args().skip(1);
    let text = match args.next() {
        Some(path) => tokio::fs::read_to_string(&path).await?,
        None => DEMO_TEXT.to_string(),
    };
    let host = args.next().unwrap_or_else(|| "demo.local".to_string());

    // 用文件/环境配置播种配置存储（真实部署中由设置界面写入）
    let store = Arc::new(InMemorySettingsStore::new());
    store
        .seed_global(&config.defaults.to_global_settings())
        .map_err(|e| anyhow::anyhow!("Failed to seed settings: {}", e))?;
    for (site_host, site) in &config.sites {
        store
            .seed_site(site_host, site)
            .map_err(|e| anyhow::anyhow!("Failed to seed site settings: {}", e))?;
    }

    // 演示用宿主界面：一个文本输入框和一个发送按钮
    let surface = Arc::new(FakeSurface::new());
    let input = surface.add_element(&["textarea"], TargetKind::TextField, false);
    let send_button = surface.add_control("发送", true);

    let relay = Arc::new(RelayService::new(
        surface.clone(),
        store,
        Arc::new(InMemoryClipboard::new()),
        DeliveryEngineConfig {
            auto_confirm: config.delivery.auto_confirm,
            settle_delay_ms: config.delivery.settle_delay_ms,
        },
    ));

    let count = relay.prepare(&host, &text).await?;
    for segment in relay.segments().await {
        tracing::info!(
            id = segment.id,
            chars = segment.content.chars().count(),
            preview = %preview(&segment.content),
            "Segment"
        );
    }
    if count == 0 {
        tracing::warn!("Nothing to deliver");
        return Ok(());
    }

    relay.clone().start_auto_send();
    while relay.auto_send_running() {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    // 给最后一次自动确认留出 settle delay
    tokio::time::sleep(Duration::from_millis(config.delivery.settle_delay_ms + 100)).await;

    tracing::info!(
        delivered = count,
        final_content = %surface.content_of(input).unwrap_or_default(),
        confirm_clicks = surface.invocations(send_button),
        "Demo finished"
    );

    Ok(())
}

/// 段落预览，长内容截断
fn preview(content: &str) -> String {
    const LIMIT: usize = 30;
    if content.chars().count() > LIMIT {
        let head: String = content.chars().take(LIMIT).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
