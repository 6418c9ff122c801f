//! Execution model: square-root market impact, sales fee, realized gain/loss.
//!
//! Buys always spend all offered cash; sells always liquidate the whole leg.
//! Impact is directional: buyers pay `price * (1 + impact)`, sellers receive
//! `price * (1 - impact)` before the sales fee.

use chrono::NaiveDateTime;

use crate::config::{ImpactConfig, SimConfig};
use crate::domain::{Fill, FillReason, Leg, PerLeg, Portfolio, TradeSide};

use super::state::RunningTotals;

/// Square-root market-impact model.
///
/// `impact = volatility * coefficient * sqrt(shares / average_daily_volume)`:
/// slippage grows sub-linearly with order size relative to typical volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SquareRootImpact {
    pub volatility: f64,
    pub average_daily_volume: f64,
    pub coefficient: f64,
}

impl SquareRootImpact {
    pub fn from_config(config: &ImpactConfig) -> Self {
        Self {
            volatility: config.volatility,
            average_daily_volume: config.average_daily_volume,
            coefficient: config.impact_coefficient,
        }
    }

    pub fn frictionless() -> Self {
        Self::from_config(&ImpactConfig::frictionless())
    }

    /// Fractional price impact of trading `shares`.
    pub fn impact(&self, shares: f64) -> f64 {
        if shares <= 0.0 {
            return 0.0;
        }
        self.volatility * self.coefficient * (shares / self.average_daily_volume).sqrt()
    }
}

/// Result of spending cash on one leg. Pure: nothing is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuyQuote {
    pub shares: f64,
    pub impact: f64,
    /// Impact-adjusted price per share; becomes the leg's cost basis.
    pub fill_price: f64,
    pub total_cost: f64,
    /// Cash left over; zero up to rounding.
    pub remaining_cash: f64,
}

/// Result of liquidating one leg. Pure: nothing is mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SellQuote {
    pub shares: f64,
    pub impact: f64,
    /// Impact-adjusted price per share, before the sales fee.
    pub fill_price: f64,
    /// Cash received after impact and sales fee.
    pub proceeds: f64,
    /// `(fill_price - cost_basis) * shares`. Positive is a gain.
    pub realized: f64,
}

/// Where a fill sits in the run, for the fill log.
#[derive(Debug, Clone, Copy)]
pub struct FillContext {
    pub bar_index: usize,
    pub timestamp: NaiveDateTime,
    pub reason: FillReason,
}

#[derive(Debug, Clone)]
pub struct ExecutionEngine {
    impact: SquareRootImpact,
    sales_fee: f64,
}

impl ExecutionEngine {
    pub fn new(impact: SquareRootImpact, sales_fee: f64) -> Self {
        Self { impact, sales_fee }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(SquareRootImpact::from_config(&config.impact), config.sales_fee)
    }

    /// No impact, no fee.
    pub fn frictionless() -> Self {
        Self::new(SquareRootImpact::frictionless(), 0.0)
    }

    /// Price a purchase of as many shares as `cash` buys at `price`.
    pub fn quote_buy(&self, cash: f64, price: f64) -> BuyQuote {
        let cash = cash.max(0.0);
        let wanted_shares = cash / price;
        let impact = self.impact.impact(wanted_shares);
        let shares = wanted_shares / (1.0 + impact);
        let fill_price = price * (1.0 + impact);
        let total_cost = shares * fill_price;
        BuyQuote {
            shares,
            impact,
            fill_price,
            total_cost,
            remaining_cash: cash - total_cost,
        }
    }

    /// Price the sale of `shares` at `price` against `cost_basis`.
    pub fn quote_sell(&self, shares: f64, price: f64, cost_basis: f64) -> SellQuote {
        let impact = self.impact.impact(shares);
        let fill_price = price * (1.0 - impact);
        let proceeds = shares * price * (1.0 - impact - self.sales_fee);
        SellQuote {
            shares,
            impact,
            fill_price,
            proceeds,
            realized: (fill_price - cost_basis) * shares,
        }
    }

    /// Spend `cash` from the portfolio on `leg` at `price`.
    pub fn buy(
        &self,
        portfolio: &mut Portfolio,
        leg: Leg,
        cash: f64,
        price: f64,
        ctx: FillContext,
    ) -> Fill {
        let quote = self.quote_buy(cash, price);

        portfolio.cash -= quote.total_cost;
        portfolio.shares[leg] += quote.shares;
        portfolio.cost_basis[leg] = quote.fill_price;
        portfolio.check_invariants();

        Fill {
            bar_index: ctx.bar_index,
            timestamp: ctx.timestamp,
            leg,
            side: TradeSide::Buy,
            reason: ctx.reason,
            shares: quote.shares,
            reference_price: price,
            impact: quote.impact,
            fill_price: quote.fill_price,
            cash_delta: -quote.total_cost,
        }
    }

    /// Liquidate all shares of `leg` at `price`, realizing gain or loss
    /// against the leg's cost basis.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        totals: &mut RunningTotals,
        leg: Leg,
        price: f64,
        ctx: FillContext,
    ) -> Fill {
        let shares = portfolio.shares[leg];
        let quote = self.quote_sell(shares, price, portfolio.cost_basis[leg]);

        totals.record_realized(quote.realized);
        portfolio.cash += quote.proceeds;
        portfolio.shares[leg] = 0.0;
        portfolio.check_invariants();

        Fill {
            bar_index: ctx.bar_index,
            timestamp: ctx.timestamp,
            leg,
            side: TradeSide::Sell,
            reason: ctx.reason,
            shares,
            reference_price: price,
            impact: quote.impact,
            fill_price: quote.fill_price,
            cash_delta: quote.proceeds,
        }
    }

    /// Sell all of `from` and put the full cash balance into the other leg.
    pub fn rotate(
        &self,
        portfolio: &mut Portfolio,
        totals: &mut RunningTotals,
        from: Leg,
        prices: &PerLeg<f64>,
        ctx: FillContext,
    ) -> [Fill; 2] {
        let to = from.other();
        let sell = self.sell(portfolio, totals, from, prices[from], ctx);
        let cash = portfolio.cash;
        let buy = self.buy(portfolio, to, cash, prices[to], ctx);
        [sell, buy]
    }
}
