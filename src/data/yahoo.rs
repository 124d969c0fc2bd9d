//! Yahoo Finance data fetcher
//!
//! Fetches option chains and the treasury-bill yield used as the risk-free
//! rate. Uses Yahoo Finance's unofficial API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::sanitize::finite_or_none;
use super::source::{ChainSource, RateSource};
use crate::config::MarketDataConfig;
use crate::core::{ContractRecord, HeatmapError, HeatmapResult, OptionChain};

/// Yahoo Finance API client
///
/// Holds configuration only. The blocking HTTP client is built per fetch so
/// it is created and dropped on the calling (blocking) thread.
#[derive(Debug, Clone, Default)]
pub struct YahooClient {
    config: MarketDataConfig,
}

impl YahooClient {
    pub fn new(config: MarketDataConfig) -> Self {
        Self { config }
    }

    fn http(&self) -> HeatmapResult<reqwest::blocking::Client> {
        Ok(reqwest::blocking::Client::builder()
            .user_agent(&self.config.user_agent)
            .timeout(self.config.timeout())
            .build()?)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        http: &reqwest::blocking::Client,
        url: &str,
        query: &[(&str, String)],
    ) -> HeatmapResult<T> {
        tracing::debug!("GET {} {:?}", url, query);
        let body = http
            .get(url)
            .query(query)
            .send()?
            .error_for_status()?
            .text()?;

        serde_json::from_str(&body).map_err(|e| {
            HeatmapError::data(format!("Failed to parse response from {}: {}", url, e))
        })
    }

    fn options_url(&self, ticker: &str) -> String {
        format!("{}/options/{}", self.config.quote_base_url, encode_symbol(ticker))
    }

    /// Option chain page for one expiration (or the nearest when `None`)
    fn get_options_page(
        &self,
        http: &reqwest::blocking::Client,
        ticker: &str,
        expiration_ts: Option<i64>,
    ) -> HeatmapResult<YahooOptionChainData> {
        let query: Vec<(&str, String)> = expiration_ts
            .map(|ts| vec![("date", ts.to_string())])
            .unwrap_or_default();

        let url = self.options_url(ticker);
        let response: YahooOptionsResponse = self.get_json(http, &url, &query)?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| {
                HeatmapError::not_found(format!("No options data returned for {}", ticker))
            })
    }

    /// Most recent daily close of `symbol`
    pub fn latest_close(&self, symbol: &str) -> HeatmapResult<f64> {
        let http = self.http()?;
        let url = format!("{}/chart/{}", self.config.chart_base_url, encode_symbol(symbol));
        let query = [("range", "5d".to_string()), ("interval", "1d".to_string())];

        let response: YahooChartResponse = self.get_json(&http, &url, &query)?;
        last_close(&response)
            .ok_or_else(|| HeatmapError::data(format!("No closing prices returned for {}", symbol)))
    }
}

impl ChainSource for YahooClient {
    fn fetch_chain(&self, ticker: &str) -> HeatmapResult<OptionChain> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(HeatmapError::invalid_argument("ticker must not be empty"));
        }

        let http = self.http()?;
        let first = self.get_options_page(&http, ticker, None)?;
        let underlying = first.quote.regular_market_price.ok_or_else(|| {
            HeatmapError::data(format!("No underlying price returned for {}", ticker))
        })?;

        let mut chain = OptionChain::new(underlying);
        for &ts in &first.expiration_dates {
            let Some(date) = expiration_label(ts) else {
                tracing::warn!("Skipping unreadable expiration timestamp {} for {}", ts, ticker);
                continue;
            };

            match self.get_options_page(&http, ticker, Some(ts)) {
                Ok(page) => add_expiration(&mut chain, date, &page, underlying),
                Err(e) => {
                    tracing::warn!("Failed to get chain for {} {}: {}", ticker, date, e);
                }
            }
        }

        if chain.is_empty() {
            return Err(HeatmapError::not_found(format!("No option data found for {}", ticker)));
        }

        tracing::info!(
            "Fetched {} expirations for {} (underlying {:.2})",
            chain.expirations.len(),
            ticker,
            underlying
        );
        Ok(chain)
    }
}

impl RateSource for YahooClient {
    /// Treasury yields are quoted in percent
    fn risk_free_rate(&self) -> HeatmapResult<f64> {
        let close = self.latest_close(&self.config.rate_symbol)?;
        Ok(close / 100.0)
    }
}

/// `^IRX` must reach Yahoo as `%5EIRX`
fn encode_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase().replace('^', "%5E")
}

/// Yahoo expirations are midnight-UTC timestamps
fn expiration_label(ts: i64) -> Option<String> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

fn add_expiration(
    chain: &mut OptionChain,
    date: String,
    page: &YahooOptionChainData,
    underlying: f64,
) {
    let (calls, puts) = match page.options.first() {
        Some(options) => (
            options.calls.iter().filter_map(|o| convert_record(o, underlying)).collect(),
            options.puts.iter().filter_map(|o| convert_record(o, underlying)).collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    chain.calls.insert(date.clone(), calls);
    chain.puts.insert(date.clone(), puts);
    chain.expirations.push(date);
}

/// Convert Yahoo option data to our record format
fn convert_record(data: &YahooOptionData, underlying: f64) -> Option<ContractRecord> {
    let strike = data.strike.and_then(finite_or_none)?;

    Some(ContractRecord {
        contract_symbol: data.contract_symbol.clone().unwrap_or_default(),
        strike,
        last_price: data.last_price.and_then(finite_or_none),
        bid: data.bid.and_then(finite_or_none),
        ask: data.ask.and_then(finite_or_none),
        change: data.change.and_then(finite_or_none),
        percent_change: data.percent_change.and_then(finite_or_none),
        volume: data.volume.filter(|v| *v >= 0).map(|v| v as u64),
        open_interest: data.open_interest.filter(|v| *v >= 0).map(|v| v as u64),
        implied_volatility: ContractRecord::format_implied_volatility(data.implied_volatility),
        underlying_price: underlying,
    })
}

fn last_close(response: &YahooChartResponse) -> Option<f64> {
    response
        .chart
        .result
        .as_ref()?
        .first()?
        .indicators
        .quote
        .first()?
        .close
        .iter()
        .rev()
        .find_map(|c| (*c).and_then(finite_or_none))
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooOptionsResponse {
    #[serde(rename = "optionChain")]
    option_chain: YahooOptionChain,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChain {
    result: Vec<YahooOptionChainData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionChainData {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    quote: YahooQuoteData,
    #[serde(default)]
    options: Vec<YahooOptions>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooOptions {
    #[serde(default)]
    calls: Vec<YahooOptionData>,
    #[serde(default)]
    puts: Vec<YahooOptionData>,
}

#[derive(Debug, Deserialize)]
struct YahooOptionData {
    #[serde(rename = "contractSymbol")]
    contract_symbol: Option<String>,
    strike: Option<f64>,
    #[serde(rename = "lastPrice")]
    last_price: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    change: Option<f64>,
    #[serde(rename = "percentChange")]
    percent_change: Option<f64>,
    volume: Option<i64>,
    #[serde(rename = "openInterest")]
    open_interest: Option<i64>,
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTIONS_PAGE: &str = r#"{
        "optionChain": {
            "result": [{
                "underlyingSymbol": "AAPL",
                "expirationDates": [1797552000, 1799971200],
                "quote": {"regularMarketPrice": 231.42},
                "options": [{
                    "expirationDate": 1797552000,
                    "calls": [
                        {"contractSymbol": "AAPL261218C00230000", "strike": 230.0,
                         "lastPrice": 18.35, "bid": 18.1, "ask": 18.6, "change": -0.4,
                         "percentChange": -2.13, "volume": 412, "openInterest": 10233,
                         "impliedVolatility": 0.2743},
                        {"contractSymbol": "AAPL261218C00400000", "strike": 400.0,
                         "lastPrice": 0.05, "bid": 0.0, "ask": 0.1, "impliedVolatility": 0.0}
                    ],
                    "puts": [
                        {"contractSymbol": "AAPL261218P00230000", "strike": 230.0,
                         "lastPrice": 14.9},
                        {"contractSymbol": "AAPL261218P00000000", "lastPrice": 1.0}
                    ]
                }]
            }]
        }
    }"#;

    #[test]
    fn test_parse_options_page() {
        let response: YahooOptionsResponse = serde_json::from_str(OPTIONS_PAGE).unwrap();
        let page = response.option_chain.result.into_iter().next().unwrap();

        assert_eq!(page.expiration_dates.len(), 2);
        assert_eq!(page.quote.regular_market_price, Some(231.42));

        let mut chain = OptionChain::new(231.42);
        let date = expiration_label(page.expiration_dates[0]).unwrap();
        add_expiration(&mut chain, date.clone(), &page, 231.42);

        assert_eq!(chain.expirations, vec![date.clone()]);
        let calls = &chain.calls[&date];
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].implied_volatility, "27.43%");
        assert_eq!(calls[0].volume, Some(412));
        assert_eq!(calls[0].underlying_price, 231.42);
        assert_eq!(calls[1].implied_volatility, "-");
        assert_eq!(calls[1].volume, None);

        // A put without a strike is dropped
        assert_eq!(chain.puts[&date].len(), 1);
        assert_eq!(chain.puts[&date][0].bid, None);
    }

    #[test]
    fn test_expiration_label() {
        assert_eq!(expiration_label(1797552000).as_deref(), Some("2026-12-18"));
    }

    #[test]
    fn test_encode_symbol() {
        assert_eq!(encode_symbol("^irx"), "%5EIRX");
        assert_eq!(encode_symbol(" aapl "), "AAPL");
    }

    #[test]
    fn test_last_close_skips_gaps() {
        let json = r#"{"chart": {"result": [
            {"indicators": {"quote": [{"close": [4.21, 4.19, null]}]}}
        ]}}"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(last_close(&response), Some(4.19));

        let json = r#"{"chart": {"result": null}}"#;
        let response: YahooChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(last_close(&response), None);
    }

    #[test]
    fn test_empty_ticker_rejected() {
        let client = YahooClient::default();
        assert!(matches!(client.fetch_chain("  "), Err(HeatmapError::InvalidArgument(_))));
    }

    #[test]
    #[ignore] // Requires network
    fn test_fetch_chain() {
        let client = YahooClient::default();
        let chain = client.fetch_chain("SPY").unwrap();

        assert!(chain.underlying_price > 0.0);
        assert!(!chain.expirations.is_empty());
        println!("SPY expirations: {:?}", chain.expirations);
    }

    #[test]
    #[ignore] // Requires network
    fn test_risk_free_rate() {
        let client = YahooClient::default();
        let rate = client.risk_free_rate().unwrap();

        assert!(rate > -0.01 && rate < 0.2);
        println!("Risk-free rate: {}", rate);
    }
}
