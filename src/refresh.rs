//! Refresh orchestrator
//!
//! Owns the two timers of the dashboard (the full-refresh interval and the
//! cosmetic 1-second countdown) as explicit state with a start/stop
//! lifecycle, instead of ambient global timers. A refresh cycle issues the
//! five section fetches concurrently; each section is delivered and rendered
//! as soon as its own response resolves, failures are logged and isolated,
//! and the cycle stamps the last-updated target once all five have settled.
//! A hung endpoint therefore stalls only its own section: the countdown
//! keeps ticking and later cycles keep starting around it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use log::{error, info};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::time::{interval, interval_at, Instant};

use crate::client::BotApi;
use crate::config::DashboardConfig;
use crate::models::{
    BotStatusSnapshot, IndicatorSnapshot, PerformanceSnapshot, RiskSnapshot, TradesResponse,
};
use crate::render::{self, targets, Surface};

/// One decoded section result, delivered the moment its fetch resolves
enum SectionUpdate {
    Status(BotStatusSnapshot),
    Indicators(IndicatorSnapshot),
    Performance(PerformanceSnapshot),
    Risk(RiskSnapshot),
    Trades {
        resp: TradesResponse,
        /// Filter that was active when the fetch was issued
        filter: Option<String>,
    },
    /// All five fetches of one cycle have settled (success or failure)
    Settled,
}

/// Drives periodic fetch-and-render cycles against a [`BotApi`]
pub struct Refresher<A, S> {
    api: Arc<A>,
    surface: S,
    tx: UnboundedSender<SectionUpdate>,
    rx: UnboundedReceiver<SectionUpdate>,
    refresh_secs: u64,
    trade_limit: u32,
    initial_capital: f64,
    max_positions: u32,
    countdown: u64,
}

impl<A, S> Refresher<A, S>
where
    A: BotApi + Send + Sync + 'static,
    S: Surface,
{
    pub fn new(api: A, mut surface: S, config: &DashboardConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        // The counter is visible at its full value before the first decrement
        surface.set_text(targets::COUNTDOWN, &config.refresh_secs.to_string());
        Self {
            api: Arc::new(api),
            surface,
            tx,
            rx,
            refresh_secs: config.refresh_secs,
            trade_limit: config.trade_limit,
            initial_capital: config.initial_capital,
            max_positions: config.max_positions,
            countdown: config.refresh_secs,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Start a refresh cycle without waiting for it
    ///
    /// The five fetches run concurrently on the runtime and each delivers a
    /// [`SectionUpdate`] as its own response resolves; none waits on a
    /// sibling, and one failing endpoint never blocks the other four. The
    /// cycle's settle marker follows once every fetch has finished either
    /// way. In-flight fetches from an earlier cycle are never cancelled, so
    /// a slow response can land after a later cycle's faster one.
    fn begin_refresh(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let limit = self.trade_limit;
        let filter = self.surface.trade_filter();

        tokio::spawn(async move {
            let status = async {
                match api.status().await {
                    Ok(snap) => {
                        let _ = tx.send(SectionUpdate::Status(snap));
                    }
                    Err(e) => error!("Status refresh failed: {e}"),
                }
            };
            let indicators = async {
                match api.indicators().await {
                    Ok(snap) => {
                        let _ = tx.send(SectionUpdate::Indicators(snap));
                    }
                    Err(e) => error!("Indicator refresh failed: {e}"),
                }
            };
            let performance = async {
                match api.performance().await {
                    Ok(snap) => {
                        let _ = tx.send(SectionUpdate::Performance(snap));
                    }
                    Err(e) => error!("Performance refresh failed: {e}"),
                }
            };
            let risk = async {
                match api.risk().await {
                    Ok(snap) => {
                        let _ = tx.send(SectionUpdate::Risk(snap));
                    }
                    Err(e) => error!("Risk refresh failed: {e}"),
                }
            };
            let trades = async {
                match api.trades(limit, filter.as_deref()).await {
                    Ok(resp) => {
                        let _ = tx.send(SectionUpdate::Trades {
                            resp,
                            filter: filter.clone(),
                        });
                    }
                    Err(e) => error!("Trade refresh failed: {e}"),
                }
            };

            tokio::join!(status, indicators, performance, risk, trades);
            let _ = tx.send(SectionUpdate::Settled);
        });
    }

    /// Render one delivered section onto the surface
    fn apply_update(&mut self, update: SectionUpdate) {
        match update {
            SectionUpdate::Status(snap) => render::render_status(
                &mut self.surface,
                &snap,
                self.initial_capital,
                self.max_positions,
            ),
            SectionUpdate::Indicators(snap) => {
                render::render_indicators(&mut self.surface, &snap)
            }
            SectionUpdate::Performance(snap) => {
                render::render_performance(&mut self.surface, &snap)
            }
            SectionUpdate::Risk(snap) => render::render_risk(&mut self.surface, &snap),
            SectionUpdate::Trades { resp, filter } => {
                render::render_trades(&mut self.surface, &resp, filter.as_deref())
            }
            SectionUpdate::Settled => {
                // Stamped once per cycle, even when every fetch failed
                self.surface.set_text(
                    targets::LAST_UPDATE,
                    &Local::now().format("%H:%M:%S").to_string(),
                );
            }
        }
    }

    /// Run one full refresh cycle to completion
    ///
    /// Sections still render individually as their responses arrive; this
    /// only waits until the cycle's settle marker before returning.
    pub async fn refresh_once(&mut self) {
        self.begin_refresh();
        loop {
            let received = self.rx.recv().await;
            let Some(update) = received else { break };
            let settled = matches!(update, SectionUpdate::Settled);
            self.apply_update(update);
            if settled {
                break;
            }
        }
    }

    /// Advance the visible countdown by one second
    ///
    /// Purely cosmetic: the counter wraps back to `refresh_secs` on its own
    /// schedule whether or not the refresh at that moment has completed, so
    /// it can drift from actual fetch timing.
    pub fn tick_countdown(&mut self) {
        if self.countdown == 0 {
            self.countdown = self.refresh_secs;
        } else {
            self.countdown -= 1;
        }
        self.surface
            .set_text(targets::COUNTDOWN, &self.countdown.to_string());
    }

    /// Run until `shutdown` resolves
    ///
    /// Starts a refresh immediately and then every `refresh_secs`. The
    /// countdown ticks on its own 1-second interval, offset so its first
    /// decrement lands a second after the full value is shown. Section
    /// updates are applied as they arrive between ticks; nothing in the loop
    /// waits on a fetch.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        let mut refresh = interval(Duration::from_secs(self.refresh_secs));
        let first_tick = Instant::now() + Duration::from_secs(1);
        let mut countdown = interval_at(first_tick, Duration::from_secs(1));
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = refresh.tick() => self.begin_refresh(),
                _ = countdown.tick() => {
                    self.tick_countdown();
                    self.surface.present();
                }
                Some(update) = self.rx.recv() => {
                    self.apply_update(update);
                    self.surface.present();
                }
                _ = &mut shutdown => {
                    info!("Dashboard stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{DashboardError, DashboardResult};
    use crate::models::{AccountSummary, MarketState};
    use crate::term::TermSurface;
    use async_trait::async_trait;

    /// Stub API whose risk endpoint can be made to fail or hang
    struct StubApi {
        fail_risk: bool,
        hang_risk: bool,
    }

    impl StubApi {
        fn healthy() -> Self {
            Self {
                fail_risk: false,
                hang_risk: false,
            }
        }
    }

    fn stub_error() -> DashboardError {
        DashboardError::Status {
            endpoint: "/api/risk",
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[async_trait]
    impl BotApi for StubApi {
        async fn status(&self) -> DashboardResult<BotStatusSnapshot> {
            Ok(BotStatusSnapshot {
                running: true,
                account: AccountSummary {
                    balance: 165.0,
                    total_pnl: 5.0,
                    total_return_percent: 3.13,
                    unrealized_pnl: 0.0,
                    equity: 0.0,
                    margin_used: 0.0,
                    peak_balance: 0.0,
                },
                positions_count: 0,
                btc_price: 107907.8,
                positions: vec![],
            })
        }

        async fn indicators(&self) -> DashboardResult<IndicatorSnapshot> {
            Ok(IndicatorSnapshot {
                adx: 27.0,
                plus_di: 20.0,
                minus_di: 10.0,
                di_spread: 10.0,
                adx_slope: 0.4,
                confidence: 70.0,
                market_state: MarketState::Trending,
                trend_strength: String::new(),
            })
        }

        async fn performance(&self) -> DashboardResult<PerformanceSnapshot> {
            Ok(PerformanceSnapshot {
                total_trades: 4,
                wins: 3,
                losses: 1,
                win_rate: 75.0,
                profit_factor: Some(2.4),
                avg_pnl: 1.25,
                best_trade: 3.0,
                worst_trade: -1.0,
                total_pnl: 5.0,
            })
        }

        async fn risk(&self) -> DashboardResult<RiskSnapshot> {
            if self.hang_risk {
                std::future::pending::<()>().await;
            }
            if self.fail_risk {
                return Err(stub_error());
            }
            Ok(RiskSnapshot {
                daily_pnl: 1.0,
                max_drawdown: 2.0,
                daily_loss_limit: 5.0,
                max_drawdown_limit: 15.0,
                consecutive_wins: 2,
                consecutive_losses: 0,
                circuit_breaker: false,
                positions_open: 0,
                positions_max: 2,
                can_trade: true,
            })
        }

        async fn trades(
            &self,
            _limit: u32,
            _mode: Option<&str>,
        ) -> DashboardResult<TradesResponse> {
            Ok(TradesResponse { trades: vec![] })
        }
    }

    #[tokio::test]
    async fn test_refresh_cycle_updates_all_sections() {
        let config = DashboardConfig::default();
        let mut refresher = Refresher::new(StubApi::healthy(), TermSurface::new(), &config);

        refresher.refresh_once().await;

        let surface = refresher.surface();
        assert_eq!(surface.text(targets::STATUS_TEXT), Some("LIVE"));
        assert_eq!(surface.text(targets::ADX_VALUE), Some("27.00"));
        assert_eq!(surface.text(targets::WIN_RATE), Some("75.00%"));
        assert_eq!(surface.text(targets::CIRCUIT_BREAKER), Some("OK"));
        assert!(surface.cards(targets::TRADES_LIST).is_some());
        assert!(surface.text(targets::LAST_UPDATE).is_some());
    }

    #[tokio::test]
    async fn test_failing_endpoint_does_not_block_siblings() {
        let config = DashboardConfig::default();
        let api = StubApi {
            fail_risk: true,
            hang_risk: false,
        };
        let mut refresher = Refresher::new(api, TermSurface::new(), &config);

        refresher.refresh_once().await;

        let surface = refresher.surface();
        // The four healthy sections rendered
        assert_eq!(surface.text(targets::STATUS_TEXT), Some("LIVE"));
        assert_eq!(surface.text(targets::ADX_VALUE), Some("27.00"));
        assert_eq!(surface.text(targets::WIN_RATE), Some("75.00%"));
        assert!(surface.cards(targets::TRADES_LIST).is_some());
        // The failed one stayed stale
        assert_eq!(surface.text(targets::CIRCUIT_BREAKER), None);
        // And the cycle still got stamped
        assert!(surface.text(targets::LAST_UPDATE).is_some());
    }

    #[tokio::test]
    async fn test_hung_endpoint_only_stalls_its_own_section() {
        let config = DashboardConfig::default();
        let api = StubApi {
            fail_risk: false,
            hang_risk: true,
        };
        let mut refresher = Refresher::new(api, TermSurface::new(), &config);

        refresher.begin_refresh();

        // Apply everything that arrives; the hung risk fetch never settles
        // the cycle, so stop once the channel goes quiet
        loop {
            let received =
                tokio::time::timeout(Duration::from_millis(200), refresher.rx.recv()).await;
            let Ok(Some(update)) = received else { break };
            refresher.apply_update(update);
        }

        let surface = refresher.surface();
        // The four live endpoints rendered without waiting on the hung one
        assert_eq!(surface.text(targets::STATUS_TEXT), Some("LIVE"));
        assert_eq!(surface.text(targets::ADX_VALUE), Some("27.00"));
        assert_eq!(surface.text(targets::WIN_RATE), Some("75.00%"));
        assert!(surface.cards(targets::TRADES_LIST).is_some());
        // The hung section stays stale and the cycle is never stamped
        assert_eq!(surface.text(targets::CIRCUIT_BREAKER), None);
        assert_eq!(surface.text(targets::LAST_UPDATE), None);
    }

    #[tokio::test]
    async fn test_filter_flows_from_surface_to_empty_state() {
        let config = DashboardConfig::default();
        let surface = TermSurface::new().with_trade_filter(Some("live".to_string()));
        let mut refresher = Refresher::new(StubApi::healthy(), surface, &config);

        refresher.refresh_once().await;

        let cards = refresher.surface().cards(targets::TRADES_LIST).unwrap();
        assert_eq!(cards[0].lines[0].text, "No live trades yet");
    }

    #[tokio::test]
    async fn test_countdown_starts_full_and_wraps_at_zero() {
        let config = DashboardConfig::default();
        let mut refresher = Refresher::new(StubApi::healthy(), TermSurface::new(), &config);

        // Full value is visible before the first decrement
        assert_eq!(refresher.surface().text(targets::COUNTDOWN), Some("5"));

        let mut seen = Vec::new();
        for _ in 0..7 {
            refresher.tick_countdown();
            let shown = refresher.surface().text(targets::COUNTDOWN).unwrap();
            seen.push(shown.to_string());
        }
        assert_eq!(seen, vec!["4", "3", "2", "1", "0", "5", "4"]);
    }
}
