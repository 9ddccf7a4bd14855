use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Merchant, MerchantId};
use crate::engine::{MerchantRevenue, RankLimit, RevenueRanker};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct MostRevenueQuery {
    /// Number of merchants to return; kept as text so bad input gets a JSON error.
    pub quantity: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedMerchant {
    pub rank: i64,
    pub merchant: Merchant,
    pub revenue: String,
    pub revenue_cents: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchantRevenueResponse {
    pub merchant: Merchant,
    pub revenue: String,
    pub revenue_cents: i64,
}

impl From<MerchantRevenue> for MerchantRevenueResponse {
    fn from(entry: MerchantRevenue) -> Self {
        Self {
            merchant: entry.merchant,
            revenue: entry.revenue.to_major_string(),
            revenue_cents: entry.revenue.minor(),
        }
    }
}

pub async fn get_most_revenue(
    Query(params): Query<MostRevenueQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<RankedMerchant>>, AppError> {
    let limit = RankLimit::parse(params.quantity.as_deref(), state.config.default_rank_limit)?;

    let snapshot = state.repo.snapshot().await?;
    let ranked = RevenueRanker::new(&snapshot)
        .top_merchants_by_revenue(limit)
        .await?;

    Ok(Json(to_ranked_entries(ranked)))
}

pub async fn get_merchant_revenue(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MerchantRevenueResponse>, AppError> {
    let merchant_id = id
        .trim()
        .parse::<i64>()
        .map(MerchantId::new)
        .map_err(|_| AppError::BadRequest(format!("Invalid merchant id: {}", id)))?;

    let snapshot = state.repo.snapshot().await?;
    let entry = RevenueRanker::new(&snapshot)
        .merchant_revenue(merchant_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Merchant {} not found", merchant_id)))?;

    Ok(Json(entry.into()))
}

fn to_ranked_entries(ranked: Vec<MerchantRevenue>) -> Vec<RankedMerchant> {
    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| RankedMerchant {
            rank: (idx + 1) as i64,
            revenue: entry.revenue.to_major_string(),
            revenue_cents: entry.revenue.minor(),
            merchant: entry.merchant,
        })
        .collect()
}
