// =============================================================================
// Yahoo Finance chart client — daily OHLCV history
// =============================================================================
//
// GET {base_url}/{ticker}?period1=..&period2=..&interval=1d
//
// The endpoint answers unknown tickers with a 404 whose body still carries a
// `chart.error` object, so the body is parsed before the status is judged.
// Bar timestamps are session opens in UTC; shifting by the exchange
// `gmtoffset` gives the local trading date.
// =============================================================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Days, NaiveDate};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::PriceSource;
use crate::error::DashboardError;
use crate::runtime_config::ProviderConfig;
use crate::types::{round1, DateRange, OhlcvRow};

/// HTTP client for the Yahoo Finance v8 chart endpoint.
#[derive(Debug, Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .with_context(|| format!("invalid user agent '{}'", config.user_agent))?;
        default_headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %config.base_url, "YahooClient initialised");

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Build the chart URL covering `range` inclusively.
    fn chart_url(&self, ticker: &str, range: &DateRange) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid provider base url '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("provider base url cannot take a path"))?
            .push(ticker);

        let period1 = midnight_utc(range.start);
        // period2 is exclusive upstream.
        let period2 = midnight_utc(range.end.checked_add_days(Days::new(1)).unwrap_or(range.end));
        url.query_pairs_mut()
            .append_pair("period1", &period1.to_string())
            .append_pair("period2", &period2.to_string())
            .append_pair("interval", "1d")
            .append_pair("events", "history")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    /// Fetch and parse the history for `ticker`, keeping rows inside `range`.
    #[instrument(skip(self), name = "yahoo::fetch_chart")]
    pub async fn fetch_chart(&self, ticker: &str, range: &DateRange) -> Result<Vec<OhlcvRow>> {
        let url = self.chart_url(ticker, range)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET chart request failed")?;

        let status = resp.status();
        let body = resp.text().await.context("failed to read chart response")?;

        let rows = parse_chart(&body).with_context(|| format!("chart endpoint returned {status}"))?;
        if !status.is_success() {
            bail!("chart endpoint returned {status}");
        }

        let rows: Vec<OhlcvRow> = rows
            .into_iter()
            .filter(|r| r.date >= range.start && r.date <= range.end)
            .collect();

        debug!(ticker, count = rows.len(), "chart fetched");
        Ok(rows)
    }
}

impl PriceSource for YahooClient {
    async fn fetch_daily(
        &self,
        ticker: &str,
        range: &DateRange,
    ) -> Result<Vec<OhlcvRow>, DashboardError> {
        self.fetch_chart(ticker, range).await.map_err(|e| {
            warn!(ticker, error = %format!("{e:#}"), "market data fetch failed");
            DashboardError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: format!("{e:#}"),
            }
        })
    }
}

fn midnight_utc(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

// =============================================================================
// Response parsing
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

fn at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten().filter(|v| v.is_finite())
}

/// Parse a chart response body into rows, oldest first.
///
/// Sessions with any missing price or volume are skipped. A result without
/// timestamps is an empty history, not an error.
pub fn parse_chart(body: &str) -> Result<Vec<OhlcvRow>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = envelope.chart.error {
        bail!("{}: {}", err.code, err.description);
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("chart response carried no result")?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut rows = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let bar = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
            at(&quote.volume, i),
        );
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = bar else {
            skipped += 1;
            continue;
        };
        let Some(stamp) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            skipped += 1;
            continue;
        };

        rows.push(OhlcvRow {
            date: stamp.date_naive(),
            open: round1(open),
            high: round1(high),
            low: round1(low),
            close: round1(close),
            adj_close: at(&adj.adjclose, i).map(round1),
            volume: volume.max(0.0).round() as u64,
        });
    }

    if skipped > 0 {
        debug!(skipped, "dropped incomplete sessions");
    }
    Ok(rows)
}
