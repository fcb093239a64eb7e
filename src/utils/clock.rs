use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use tokio::time::Instant;

/// Represents an entity responsible for providing dates across application. Every decision that
/// depends on "now" asks a clock, which allows it to be replaced during testing.
#[async_trait]
pub trait Clock<Tz: TimeZone = Local>: Sync + Send + 'static {
    fn time(&self) -> DateTime<Tz>;

    fn instant(&self) -> Instant;

    async fn sleep_until(&self, instant: Instant);
}

/// Wall clock in the local time zone of the machine.
pub struct LocalClock;

#[async_trait]
impl Clock for LocalClock {
    fn time(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }

    async fn sleep_until(&self, instant: Instant) {
        tokio::time::sleep_until(instant).await;
    }
}

#[cfg(test)]
pub mod test_clock {
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, TimeZone};
    use tokio::time::Instant;

    use super::Clock;

    /// Clock that starts at `start_time` and follows tokio time from there, so that paused tests
    /// move both together.
    #[derive(Clone)]
    pub struct TestClock {
        start_time: DateTime<FixedOffset>,
        reference: Instant,
    }

    impl TestClock {
        pub fn new(start_time: DateTime<FixedOffset>) -> Self {
            Self {
                start_time,
                reference: Instant::now(),
            }
        }

        /// Clock in Indian Standard Time, starting at the given local time.
        pub fn ist(y: i32, m: u32, d: u32, h: u32, min: u32) -> Self {
            let zone = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
            Self::new(zone.with_ymd_and_hms(y, m, d, h, min, 0).unwrap())
        }
    }

    #[async_trait]
    impl Clock<FixedOffset> for TestClock {
        fn time(&self) -> DateTime<FixedOffset> {
            self.start_time + self.reference.elapsed()
        }

        fn instant(&self) -> Instant {
            Instant::now()
        }

        async fn sleep_until(&self, instant: Instant) {
            tokio::time::sleep_until(instant).await;
        }
    }
}
