//! Auto-Send Scheduler - 定时投递调度
//!
//! Idle/Running 两态状态机：Running 时以固定周期调用投递回调，
//! 回调报告没有剩余段落时自动回到 Idle。停止是协作式的，
//! 只在两次 tick 之间生效，进行中的投递不会被打断。

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// 投递回调
///
/// 每次 tick 调用一次，返回是否还有剩余段落。
#[async_trait]
pub trait DeliverNext: Send + Sync {
    async fn deliver_next(&self) -> bool;
}

struct RunningTimer {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// 定时投递调度器
#[derive(Default)]
pub struct AutoSendScheduler {
    running: Mutex<Option<RunningTimer>>,
}

impl AutoSendScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 进入 Running：以 `interval` 为周期调用 `deliver`
    ///
    /// 已在 Running 时先隐式停止旧定时器，不会出现重叠定时器。
    /// 第一次触发发生在一个完整周期之后。tick 串行执行，
    /// 单次投递完整结束前不会调度下一次。
    pub fn start(&self, deliver: Arc<dyn DeliverNext>, interval: Duration) {
        self.stop();

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval 的首个 tick 立即返回，跳过以获得固定周期语义
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // 投递放在分支体内执行，停止信号不会与进行中的投递竞争
                        if !deliver.deliver_next().await {
                            tracing::debug!("No segments remain, scheduler going idle");
                            break;
                        }
                    }
                    _ = stop_rx.changed() => {
                        tracing::debug!("Stop signal received");
                        break;
                    }
                }
            }
        });

        tracing::info!(interval_ms = interval.as_millis() as u64, "Auto-send started");
        *self.lock() = Some(RunningTimer { stop_tx, handle });
    }

    /// 回到 Idle；Idle 时调用是无操作
    pub fn stop(&self) {
        if let Some(timer) = self.lock().take() {
            // 任务已自行结束时接收端已关闭，发送失败可忽略
            let _ = timer.stop_tx.send(true);
            tracing::info!("Auto-send stopped");
        }
    }

    /// 是否处于 Running（定时任务仍在运行）
    pub fn is_running(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|timer| !timer.handle.is_finished())
            .unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<RunningTimer>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
