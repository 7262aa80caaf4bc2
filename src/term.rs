//! Terminal front-end for the dashboard
//!
//! [`TermSurface`] is the concrete render target: an in-memory document of
//! texts, classes, widths, and card lists keyed by target id. Renderers
//! mutate it through the [`Surface`] trait and `render` lays the whole
//! dashboard out as a single string, the same way the bot's web dashboard is
//! produced as one string per refresh. `present` repaints the terminal with
//! that frame.

use std::collections::HashMap;
use std::io::Write;

use crate::render::{targets, Card, Surface};

const RESET: &str = "\x1b[0m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";

/// ANSI color for a presentation class
fn class_color(class: &str) -> &'static str {
    match class {
        "positive" | "online" | "win" | "long" | "trending" => GREEN,
        "negative" | "offline" | "loss" | "short" | "danger" => RED,
        "warning" | "building" => YELLOW,
        "ranging" => CYAN,
        _ => "",
    }
}

/// In-memory render target with a terminal painter
#[derive(Debug, Default)]
pub struct TermSurface {
    texts: HashMap<String, String>,
    classes: HashMap<String, &'static str>,
    widths: HashMap<String, f64>,
    cards: HashMap<String, Vec<Card>>,
    trade_filter: Option<String>,
    interactive: bool,
}

impl TermSurface {
    /// Create a surface that records mutations without painting
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface that repaints the terminal on every `present`
    pub fn interactive() -> Self {
        Self {
            interactive: true,
            ..Self::default()
        }
    }

    /// Set the trading-mode filter reported to the orchestrator
    pub fn with_trade_filter(mut self, filter: Option<String>) -> Self {
        self.trade_filter = filter;
        self
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts.get(id).map(String::as_str)
    }

    pub fn class(&self, id: &str) -> Option<&'static str> {
        self.classes.get(id).copied()
    }

    pub fn width(&self, id: &str) -> Option<f64> {
        self.widths.get(id).copied()
    }

    pub fn cards(&self, id: &str) -> Option<&[Card]> {
        self.cards.get(id).map(Vec::as_slice)
    }

    fn colored(&self, id: &str) -> String {
        let text = self.text(id).unwrap_or("--");
        match self.class(id).map(class_color).filter(|c| !c.is_empty()) {
            Some(color) => format!("{color}{text}{RESET}"),
            None => text.to_string(),
        }
    }

    /// Draw a progress bar for a width target, 20 cells wide
    fn bar(&self, id: &str) -> String {
        let pct = self.width(id).unwrap_or(0.0).clamp(0.0, 100.0);
        let filled = (pct / 5.0).round() as usize;
        let color = self
            .class(id)
            .map(class_color)
            .filter(|c| !c.is_empty())
            .unwrap_or(GREEN);
        format!(
            "{color}{}{DIM}{}{RESET}",
            "#".repeat(filled),
            "-".repeat(20 - filled)
        )
    }

    fn card_block(&self, id: &str, out: &mut String) {
        if let Some(cards) = self.cards(id) {
            for card in cards {
                for (i, line) in card.lines.iter().enumerate() {
                    let bullet = if i == 0 { "  * " } else { "    " };
                    match line.class.map(class_color).filter(|c| !c.is_empty()) {
                        Some(color) => {
                            out.push_str(&format!("{bullet}{color}{}{RESET}\n", line.text))
                        }
                        None => out.push_str(&format!("{bullet}{}\n", line.text)),
                    }
                }
            }
        }
    }

    /// Lay the dashboard out as one frame
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{CYAN}ADX STRATEGY DASHBOARD{RESET}  bot {}  {DIM}refresh in {}s, updated {}{RESET}\n",
            self.colored(targets::STATUS_TEXT),
            self.text(targets::COUNTDOWN).unwrap_or("-"),
            self.text(targets::LAST_UPDATE).unwrap_or("never"),
        ));
        out.push_str(&format!("{DIM}{}{RESET}\n", "=".repeat(72)));

        out.push_str(&format!(
            "Balance {} ({})  P&L {} ({})  Unrealized {}\n",
            self.text(targets::BALANCE).unwrap_or("--"),
            self.colored(targets::BALANCE_CHANGE),
            self.colored(targets::TOTAL_PNL),
            self.colored(targets::TOTAL_RETURN),
            self.colored(targets::UNREALIZED_PNL),
        ));
        out.push_str(&format!(
            "BTC {}  Positions {}\n",
            self.text(targets::BTC_PRICE).unwrap_or("--"),
            self.text(targets::POSITIONS_COUNT).unwrap_or("-/-"),
        ));
        self.card_block(targets::POSITIONS_LIST, &mut out);

        out.push_str(&format!(
            "\nADX {} [{}] {}  +DI {}  -DI {}  spread {}  slope {}  conf {}\n",
            self.colored(targets::ADX_VALUE),
            self.bar(targets::ADX_BAR),
            self.colored(targets::MARKET_STATE),
            self.text(targets::PLUS_DI).unwrap_or("--"),
            self.text(targets::MINUS_DI).unwrap_or("--"),
            self.text(targets::DI_SPREAD).unwrap_or("--"),
            self.text(targets::ADX_SLOPE).unwrap_or("--"),
            self.text(targets::CONFIDENCE).unwrap_or("--"),
        ));

        out.push_str(&format!(
            "Trades {} ({}W/{}L)  Win rate {}  Profit factor {}  Avg {}  Best {}\n",
            self.text(targets::TOTAL_TRADES).unwrap_or("--"),
            self.text(targets::WINS).unwrap_or("-"),
            self.text(targets::LOSSES).unwrap_or("-"),
            self.colored(targets::WIN_RATE),
            self.text(targets::PROFIT_FACTOR).unwrap_or("--"),
            self.colored(targets::AVG_PNL),
            self.colored(targets::BEST_TRADE),
        ));

        out.push_str(&format!(
            "Risk  daily {} [{}]  drawdown {} [{}]  streak {}W/{}L  breaker {}\n",
            self.colored(targets::DAILY_PNL),
            self.bar(targets::DAILY_PNL_BAR),
            self.text(targets::MAX_DRAWDOWN).unwrap_or("--"),
            self.bar(targets::DRAWDOWN_BAR),
            self.text(targets::CONSECUTIVE_WINS).unwrap_or("-"),
            self.text(targets::CONSECUTIVE_LOSSES).unwrap_or("-"),
            self.colored(targets::CIRCUIT_BREAKER),
        ));

        out.push_str("\nRecent trades\n");
        self.card_block(targets::TRADES_LIST, &mut out);

        out
    }
}

impl Surface for TermSurface {
    fn set_text(&mut self, id: &str, text: &str) {
        self.texts.insert(id.to_string(), text.to_string());
    }

    fn set_class(&mut self, id: &str, class: Option<&'static str>) {
        match class {
            Some(class) => {
                self.classes.insert(id.to_string(), class);
            }
            None => {
                self.classes.remove(id);
            }
        }
    }

    fn set_width(&mut self, id: &str, percent: f64) {
        self.widths.insert(id.to_string(), percent);
    }

    fn set_cards(&mut self, id: &str, cards: Vec<Card>) {
        self.cards.insert(id.to_string(), cards);
    }

    fn trade_filter(&self) -> Option<String> {
        self.trade_filter.clone()
    }

    fn present(&mut self) {
        if !self.interactive {
            return;
        }
        let mut stdout = std::io::stdout().lock();
        // Clear screen, home cursor, paint the frame
        let _ = write!(stdout, "\x1b[2J\x1b[H{}", self.render());
        let _ = stdout.flush();
    }
}
