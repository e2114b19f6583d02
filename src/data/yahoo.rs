//! Yahoo Finance data fetcher
//!
//! Fetches free, delayed options data through Yahoo Finance's unofficial
//! API. Requests are issued back to back with no pacing or retry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::provider::{ChainProvider, SpotProvider, SpotQuote};
use crate::core::{ChainError, ChainResult, ExpiryChain, OptionContract, OptionType};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v7/finance";

/// Yahoo Finance API client
pub struct YahooClient {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> ChainResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> ChainResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ChainError::upstream(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> ChainResult<T> {
        debug!("GET {}", url);

        self.client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| ChainError::upstream(e.to_string()))?
            .json()
            .map_err(|e| ChainError::data(format!("Failed to parse response: {}", e)))
    }

    fn options_page(&self, symbol: &str, date: Option<i64>) -> ChainResult<YahooOptionChainData> {
        let url = match date {
            Some(ts) => format!("{}/options/{}?date={}", self.base_url, symbol, ts),
            None => format!("{}/options/{}", self.base_url, symbol),
        };

        let response: YahooOptionsResponse = self.get_json(&url)?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::upstream(format!("No options data returned for {}", symbol)))
    }

    /// Convert Yahoo option data to a raw contract
    fn convert_contract(
        data: &YahooOptionData,
        underlying: &str,
        expiry: NaiveDate,
        kind: OptionType,
    ) -> Option<OptionContract> {
        let strike = match data.strike {
            Some(k) => k,
            None => {
                debug!("Dropping {:?}: no strike", data.contract_symbol);
                return None;
            }
        };

        let symbol = data
            .contract_symbol
            .clone()
            .unwrap_or_else(|| occ_symbol(underlying, expiry, kind, strike));

        Some(OptionContract {
            symbol,
            kind,
            strike,
            expiry,
            market_price: data.last_price,
            implied_vol: data.implied_volatility,
        })
    }
}

impl SpotProvider for YahooClient {
    fn spot(&self, symbol: &str) -> ChainResult<SpotQuote> {
        let url = format!("{}/quote?symbols={}", self.base_url, symbol);

        let response: YahooQuoteResponse = self.get_json(&url)?;
        let result = response
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::upstream(format!("No quote data returned for {}", symbol)))?;

        let price = result
            .regular_market_price
            .ok_or_else(|| ChainError::upstream(format!("No market price for {}", symbol)))?;

        Ok(SpotQuote {
            symbol: symbol.to_string(),
            price,
            bid: result.bid,
            ask: result.ask,
            timestamp: Utc::now(),
        })
    }
}

impl ChainProvider for YahooClient {
    fn expirations(&self, symbol: &str) -> ChainResult<Vec<NaiveDate>> {
        let page = self.options_page(symbol, None)?;
        Ok(parse_expirations(&page.expiration_dates))
    }

    fn chain(&self, symbol: &str, expiry: NaiveDate) -> ChainResult<ExpiryChain> {
        let page = self.options_page(symbol, Some(expiry_timestamp(expiry)?))?;
        Ok(build_chain(&page, symbol, expiry))
    }
}

/// Yahoo keys chains by midnight-UTC timestamps
fn expiry_timestamp(expiry: NaiveDate) -> ChainResult<i64> {
    expiry
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| ChainError::invalid_input(format!("bad expiry {}", expiry)))
}

fn parse_expirations(timestamps: &[i64]) -> Vec<NaiveDate> {
    let mut expiries: Vec<NaiveDate> = timestamps
        .iter()
        .filter_map(|&ts| DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive()))
        .collect();
    expiries.sort();
    expiries.dedup();
    expiries
}

fn build_chain(page: &YahooOptionChainData, symbol: &str, expiry: NaiveDate) -> ExpiryChain {
    let mut chain = ExpiryChain::new(expiry);

    if let Some(options) = page.options.first() {
        let calls = options.calls.iter().map(|d| (d, OptionType::Call));
        let puts = options.puts.iter().map(|d| (d, OptionType::Put));

        for (data, kind) in calls.chain(puts) {
            if let Some(contract) = YahooClient::convert_contract(data, symbol, expiry, kind) {
                chain.push(contract);
            }
        }
    }

    chain
}

/// OCC-style symbol, e.g. SPY250321C00500000
fn occ_symbol(underlying: &str, expiry: NaiveDate, kind: OptionType, strike: f64) -> String {
    let cp = match kind {
        OptionType::Call => 'C',
        OptionType::Put => 'P',
    };
    format!(
        "{}{}{}{:08}",
        underlying,
        expiry.format("%y%m%d"),
        cp,
        (strike * 1000.0).round() as u64
    )
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteResult,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteResult {
    result: Vec<YahooQuoteData>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteData {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
}

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
    #[serde(default)]
    options: Vec<YahooOptions>,
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
    #[serde(rename = "impliedVolatility")]
    implied_volatility: Option<f64>,
}
