use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

/// 固定间隔的前台任务，运行到 Ctrl+C 为止
pub struct IntervalScheduler {
    inner: JobScheduler,
    jobs: usize,
}

impl IntervalScheduler {
    pub async fn new() -> Result<Self> {
        Ok(Self {
            inner: JobScheduler::new().await?,
            jobs: 0,
        })
    }

    /// 每隔 `interval` 调用一次 `tick`
    pub async fn every<F>(&mut self, interval: Duration, tick: Arc<F>) -> Result<()>
    where
        F: Fn() + Send + Sync + 'static,
    {
        let job = Job::new_repeated_async(interval, move |_id, _scheduler| {
            let tick = Arc::clone(&tick);
            Box::pin(async move {
                debug!("定时触发");
                tick();
            })
        })?;
        self.inner.add(job).await?;
        self.jobs += 1;
        Ok(())
    }

    pub async fn run_until_ctrl_c(mut self) -> Result<()> {
        self.inner.start().await?;
        info!("{} 个定时任务运行中，按 Ctrl+C 退出", self.jobs);

        tokio::signal::ctrl_c().await?;

        self.inner.shutdown().await?;
        info!("定时任务已停止");
        Ok(())
    }
}
