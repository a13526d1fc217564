//! Derived-view computations
//!
//! Pure, stateless projections of store state into display aggregates. All
//! inputs are small in-memory slices, so nothing here caches or memoizes;
//! every function is recomputed on demand by the rendering layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{GreenBean, InventoryMovement, RoastingSession, Sale};
use crate::types::{DateRange, ProductType, QualityGrade, StockStatus};

// ============================================================================
// Date-Range Filtering & Revenue
// ============================================================================

/// Filter a collection down to entries whose date falls inside the range.
///
/// Both endpoints are inclusive. The same helper backs "last 7 days",
/// "this month", "this year", and custom ranges.
pub fn filter_by_date_range<'a, T>(
    items: &'a [T],
    range: &DateRange,
    date_of: impl Fn(&T) -> DateTime<Utc>,
) -> Vec<&'a T> {
    items.iter().filter(|item| range.contains(date_of(item))).collect()
}

/// Sales whose sale date falls inside the range.
pub fn sales_in_range<'a>(sales: &'a [Sale], range: &DateRange) -> Vec<&'a Sale> {
    filter_by_date_range(sales, range, |sale| sale.sale_date)
}

/// Roasting sessions whose roast date falls inside the range.
pub fn sessions_in_range<'a>(
    sessions: &'a [RoastingSession],
    range: &DateRange,
) -> Vec<&'a RoastingSession> {
    filter_by_date_range(sessions, range, |session| session.roast_date)
}

/// Sum of `total_amount` over a set of sales.
pub fn total_revenue<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Decimal {
    sales.into_iter().map(|sale| sale.total_amount).sum()
}

/// Period-over-period change in percent.
///
/// Defined as `0` when the previous period is zero, so a division-by-zero
/// artifact is never observable.
pub fn period_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }
    (current - previous) / previous * Decimal::from(100)
}

// ============================================================================
// Roasting Yield
// ============================================================================

/// Yield of one session in percent: `roasted / green * 100`.
pub fn session_yield(session: &RoastingSession) -> Decimal {
    if session.green_bean_quantity.is_zero() {
        return Decimal::ZERO;
    }
    session.roasted_quantity / session.green_bean_quantity * Decimal::from(100)
}

/// Mean yield over all sessions referencing a bean, `0` when none exist.
pub fn average_yield(bean_id: Uuid, sessions: &[RoastingSession]) -> Decimal {
    let yields: Vec<Decimal> = sessions
        .iter()
        .filter(|session| session.green_bean_id == bean_id)
        .map(session_yield)
        .collect();

    if yields.is_empty() {
        return Decimal::ZERO;
    }
    yields.iter().copied().sum::<Decimal>() / Decimal::from(yields.len() as i64)
}

// ============================================================================
// Stock Classification & Turnover
// ============================================================================

/// Classify a stock balance against its low-stock threshold.
///
/// Boundary values fall into the severer bucket: `quantity <= threshold` is
/// critical, `quantity <= 2 * threshold` is warning.
pub fn stock_status(quantity: Decimal, low_stock_threshold: Decimal) -> StockStatus {
    if quantity <= low_stock_threshold {
        StockStatus::Critical
    } else if quantity <= low_stock_threshold * Decimal::from(2) {
        StockStatus::Warning
    } else {
        StockStatus::Normal
    }
}

/// Annualized turnover estimate: `consumed / (current + consumed/2) * 365`.
///
/// The denominator approximates average stock over the lot's life; this is
/// an estimate for the tracking view, not a ledger-accurate figure.
pub fn turnover_rate(total_consumed: Decimal, current_quantity: Decimal) -> Decimal {
    let average_stock = current_quantity + total_consumed / Decimal::from(2);
    if average_stock.is_zero() {
        return Decimal::ZERO;
    }
    total_consumed / average_stock * Decimal::from(365)
}

/// Total kilograms consumed from a lot by roasting sessions and direct
/// green-bean sales.
pub fn total_consumed(bean_id: Uuid, sessions: &[RoastingSession], sales: &[Sale]) -> Decimal {
    let roasted: Decimal = sessions
        .iter()
        .filter(|session| session.green_bean_id == bean_id)
        .map(|session| session.green_bean_quantity)
        .sum();

    let sold: Decimal = sales
        .iter()
        .filter(|sale| sale.green_bean_id() == Some(bean_id))
        .map(|sale| sale.quantity)
        .sum();

    roasted + sold
}

/// Purchase value of all remaining stock.
pub fn inventory_value(beans: &[GreenBean]) -> Decimal {
    beans.iter().map(GreenBean::stock_value).sum()
}

/// Lots at or below their low-stock threshold.
pub fn low_stock_beans(beans: &[GreenBean]) -> Vec<&GreenBean> {
    beans.iter().filter(|bean| bean.is_low_stock()).collect()
}

/// Reconstruct the movement log for the tracking view, newest first.
pub fn inventory_movements(
    beans: &[GreenBean],
    sessions: &[RoastingSession],
    sales: &[Sale],
) -> Vec<InventoryMovement> {
    let mut movements = Vec::new();

    for session in sessions {
        if let Some(bean) = beans.iter().find(|b| b.id == session.green_bean_id) {
            movements.push(InventoryMovement {
                date: session.roast_date,
                bean_id: bean.id,
                bean_variety: bean.variety.clone(),
                quantity: -session.green_bean_quantity,
                reason: "Roasting Session".to_string(),
            });
        }
    }

    for sale in sales {
        if sale.product_type == ProductType::Green {
            if let Some(bean) = sale
                .green_bean_id()
                .and_then(|id| beans.iter().find(|b| b.id == id))
            {
                movements.push(InventoryMovement {
                    date: sale.sale_date,
                    bean_id: bean.id,
                    bean_variety: bean.variety.clone(),
                    quantity: -sale.quantity,
                    reason: "Direct Sale".to_string(),
                });
            }
        }
    }

    for bean in beans {
        movements.push(InventoryMovement {
            date: bean.entry_date,
            bean_id: bean.id,
            bean_variety: bean.variety.clone(),
            quantity: bean.quantity,
            reason: "Initial Stock".to_string(),
        });
    }

    movements.sort_by(|a, b| b.date.cmp(&a.date));
    movements
}

// ============================================================================
// Quality
// ============================================================================

/// Grade an overall quality score on the 0-10 scale.
pub fn quality_grade(score: Decimal) -> QualityGrade {
    if score >= Decimal::new(75, 1) {
        QualityGrade::Excellent
    } else if score >= Decimal::from(6) {
        QualityGrade::VeryGood
    } else if score >= Decimal::new(45, 1) {
        QualityGrade::Good
    } else if score >= Decimal::from(4) {
        QualityGrade::Fair
    } else {
        QualityGrade::Poor
    }
}

/// Mean of the recorded quality scores, `0` when none exist.
pub fn average_quality(sessions: &[RoastingSession]) -> Decimal {
    let scores: Vec<Decimal> = sessions
        .iter()
        .filter_map(|session| session.quality_score)
        .collect();

    if scores.is_empty() {
        return Decimal::ZERO;
    }
    scores.iter().copied().sum::<Decimal>() / Decimal::from(scores.len() as i64)
}

// ============================================================================
// Pricing
// ============================================================================

/// Per-kg operating cost inputs for the pricing calculator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperatingCosts {
    pub electricity: Decimal,
    pub labor: Decimal,
    pub packaging: Decimal,
    pub overhead: Decimal,
}

impl OperatingCosts {
    pub fn total(&self) -> Decimal {
        self.electricity + self.labor + self.packaging + self.overhead
    }
}

/// Output of the pricing calculator
#[derive(Debug, Clone, PartialEq)]
pub struct PricingBreakdown {
    pub green_cost_per_kg: Decimal,
    pub operating_cost_per_kg: Decimal,
    /// Green cost scaled up by roast weight loss, plus operating costs.
    pub roasted_cost_per_kg: Decimal,
    pub suggested_retail_price: Decimal,
    pub profit_per_kg: Decimal,
    pub margin_percent: Decimal,
}

/// Suggest a retail price for roasted coffee from a lot.
///
/// The green cost per roasted kg is `purchase_price / yield_ratio`; a zero
/// yield ratio yields a zero-cost breakdown rather than a division error.
pub fn price_suggestion(
    purchase_price_per_kg: Decimal,
    yield_ratio: Decimal,
    costs: &OperatingCosts,
    target_margin_percent: Decimal,
) -> PricingBreakdown {
    let green_cost = if yield_ratio.is_zero() {
        Decimal::ZERO
    } else {
        purchase_price_per_kg / yield_ratio
    };
    let operating = costs.total();
    let roasted_cost = green_cost + operating;
    let suggested =
        roasted_cost * (Decimal::ONE + target_margin_percent / Decimal::from(100));

    PricingBreakdown {
        green_cost_per_kg: green_cost,
        operating_cost_per_kg: operating,
        roasted_cost_per_kg: roasted_cost,
        suggested_retail_price: suggested,
        profit_per_kg: suggested - roasted_cost,
        margin_percent: target_margin_percent,
    }
}

// ============================================================================
// Financial Reporting
// ============================================================================

/// Aggregates for the financial report screen
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialReport {
    pub revenue: Decimal,
    pub costs: Decimal,
    pub gross_profit: Decimal,
    /// Percent of revenue, `0` when there was no revenue.
    pub profit_margin: Decimal,
    pub inventory_value: Decimal,
}

/// Build the financial report for a period.
///
/// Costs are the purchase value of held stock plus a flat estimated
/// operating cost per roasting session.
pub fn financial_report(
    sales: &[Sale],
    beans: &[GreenBean],
    sessions: &[RoastingSession],
    range: &DateRange,
    operating_cost_per_session: Decimal,
) -> FinancialReport {
    let revenue = total_revenue(sales_in_range(sales, range));
    let bean_costs = inventory_value(beans);
    let operating_costs = Decimal::from(sessions.len() as i64) * operating_cost_per_session;
    let costs = bean_costs + operating_costs;
    let gross_profit = revenue - costs;
    let profit_margin = if revenue.is_zero() {
        Decimal::ZERO
    } else {
        gross_profit / revenue * Decimal::from(100)
    };

    FinancialReport {
        revenue,
        costs,
        gross_profit,
        profit_margin,
        inventory_value: bean_costs,
    }
}
