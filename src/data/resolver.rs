//! Contract resolver
//!
//! Turns a chain record picked by (expiration, strike) into the scalar inputs
//! the pricer needs, fetching the current risk-free rate on the way.

use chrono::{Local, NaiveDate};

use super::source::RateSource;
use crate::core::{Contract, ContractRecord, ExpiryMap, HeatmapError, HeatmapResult, OptionType};

/// Strikes closer than this are the same listing
pub const STRIKE_TOLERANCE: f64 = 1e-6;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Find the record listed at `strike` for `expiration_date`
pub fn find_record<'a>(
    records: &'a ExpiryMap,
    expiration_date: &str,
    strike: f64,
) -> HeatmapResult<&'a ContractRecord> {
    let listed = records.get(expiration_date).ok_or_else(|| {
        HeatmapError::not_found(format!("expiration {} not in chain", expiration_date))
    })?;

    listed
        .iter()
        .find(|r| (r.strike - strike).abs() < STRIKE_TOLERANCE)
        .ok_or_else(|| {
            HeatmapError::not_found(format!(
                "strike {} not listed for {}",
                strike, expiration_date
            ))
        })
}

/// Years from `today` to `expiration_date` (calendar days / 365)
pub fn years_to_expiry(expiration_date: &str, today: NaiveDate) -> HeatmapResult<f64> {
    let expiry = NaiveDate::parse_from_str(expiration_date, DATE_FORMAT).map_err(|e| {
        HeatmapError::invalid_argument(format!("bad expiration date '{}': {}", expiration_date, e))
    })?;

    let days = (expiry - today).num_days();
    if days < 0 {
        return Err(HeatmapError::invalid_argument(format!(
            "contract expired on {}",
            expiration_date
        )));
    }
    Ok(days as f64 / 365.0)
}

/// Resolve pricing inputs for one listed contract as of `today`
pub fn resolve<R: RateSource + ?Sized>(
    records: &ExpiryMap,
    expiration_date: &str,
    strike: f64,
    option_type: OptionType,
    today: NaiveDate,
    rates: &R,
) -> HeatmapResult<Contract> {
    let record = find_record(records, expiration_date, strike)?;
    let time_to_expiry = years_to_expiry(expiration_date, today)?;
    let implied_volatility = record.implied_volatility_fraction()?;
    let last_traded_price = record.last_price.ok_or_else(|| {
        HeatmapError::not_found(format!("{} has no last trade", record.contract_symbol))
    })?;

    let risk_free_rate = rates.risk_free_rate()?;

    tracing::debug!(
        "Resolved {} {}: T={:.4}y iv={:.4} r={:.4}",
        record.contract_symbol,
        option_type,
        time_to_expiry,
        implied_volatility,
        risk_free_rate
    );

    Ok(Contract {
        underlying_price: record.underlying_price,
        strike_price: record.strike,
        time_to_expiry,
        implied_volatility,
        risk_free_rate,
        option_type,
        last_traded_price,
    })
}

/// [`resolve`] as of the local calendar date
pub fn resolve_today<R: RateSource + ?Sized>(
    records: &ExpiryMap,
    expiration_date: &str,
    strike: f64,
    option_type: OptionType,
    rates: &R,
) -> HeatmapResult<Contract> {
    let today = Local::now().date_naive();
    resolve(records, expiration_date, strike, option_type, today, rates)
}
