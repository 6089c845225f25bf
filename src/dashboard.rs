//! Public, shop-wide dashboard figures. Unlike [`crate::activity`] nothing
//! here is scoped to a user, and store errors propagate to the caller.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    activity::{ActivityItem, ActivityKind, PublicServiceRow, PublicStats},
    vehicle::VehicleStatus,
};

pub const PUBLIC_ACTIVITY_LIMIT: i64 = 10;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error(transparent)]
    Store(#[from] sqlx::Error),
    #[error("revenue total exceeds the decimal range")]
    RevenueOverflow,
}

#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn customer_count(&self) -> Result<i64, sqlx::Error>;

    async fn vehicle_statuses(&self) -> Result<Vec<VehicleStatus>, sqlx::Error>;

    async fn service_costs(&self) -> Result<Vec<Decimal>, sqlx::Error>;

    /// Newest services across the whole shop.
    async fn latest_services(&self, limit: i64) -> Result<Vec<PublicServiceRow>, sqlx::Error>;
}

pub async fn public_stats<S>(source: &S) -> Result<PublicStats, StatsError>
where
    S: StatsSource + ?Sized,
{
    let (customer_count, statuses, costs) = tokio::try_join!(
        source.customer_count(),
        source.vehicle_statuses(),
        source.service_costs(),
    )?;

    summarize(customer_count, &statuses, &costs)
}

pub fn summarize(
    customer_count: i64,
    statuses: &[VehicleStatus],
    costs: &[Decimal],
) -> Result<PublicStats, StatsError> {
    let active = statuses
        .iter()
        .filter(|s| **s == VehicleStatus::Active)
        .count();
    let total_revenue = costs
        .iter()
        .try_fold(Decimal::ZERO, |total, cost| total.checked_add(*cost))
        .ok_or(StatsError::RevenueOverflow)?;

    Ok(PublicStats {
        customer_count,
        active_vehicle_count: i64::try_from(active).unwrap_or(i64::MAX),
        service_count: i64::try_from(costs.len()).unwrap_or(i64::MAX),
        total_revenue: total_revenue.normalize(),
    })
}

pub async fn public_activity<S>(source: &S) -> Result<Vec<ActivityItem>, sqlx::Error>
where
    S: StatsSource + ?Sized,
{
    let rows = source.latest_services(PUBLIC_ACTIVITY_LIMIT).await?;
    Ok(rows.into_iter().map(public_item).collect())
}

fn public_item(row: PublicServiceRow) -> ActivityItem {
    ActivityItem {
        id: row.id,
        kind: ActivityKind::Service,
        title: "New Service Added".to_string(),
        description: format!("{} service for {}'s vehicle", row.service_type, row.customer_name),
        timestamp: row.created_at,
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Utc;

    use super::*;

    struct FakeStats {
        statuses: Vec<VehicleStatus>,
        costs: Vec<Decimal>,
        broken: bool,
    }

    #[async_trait]
    impl StatsSource for FakeStats {
        async fn customer_count(&self) -> Result<i64, sqlx::Error> {
            Ok(4)
        }

        async fn vehicle_statuses(&self) -> Result<Vec<VehicleStatus>, sqlx::Error> {
            Ok(self.statuses.clone())
        }

        async fn service_costs(&self) -> Result<Vec<Decimal>, sqlx::Error> {
            if self.broken {
                return Err(sqlx::Error::PoolClosed);
            }
            Ok(self.costs.clone())
        }

        async fn latest_services(&self, _limit: i64) -> Result<Vec<PublicServiceRow>, sqlx::Error> {
            if self.broken {
                return Err(sqlx::Error::PoolClosed);
            }
            Ok(vec![PublicServiceRow {
                id: "s1".into(),
                service_type: "Brake".into(),
                customer_name: "Ana".into(),
                created_at: Utc::now(),
            }])
        }
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn revenue_is_exact() {
        let source = FakeStats {
            statuses: vec![
                VehicleStatus::Active,
                VehicleStatus::Active,
                VehicleStatus::InService,
            ],
            costs: vec![dec("45.50"), dec("0"), dec("12.25")],
            broken: false,
        };

        let stats = public_stats(&source).await.unwrap();
        assert_eq!(stats.customer_count, 4);
        assert_eq!(stats.active_vehicle_count, 2);
        assert_eq!(stats.service_count, 3);
        assert_eq!(stats.total_revenue, dec("57.75"));
    }

    #[test]
    fn fractional_cents_survive_summation() {
        let costs: Vec<_> = std::iter::repeat(dec("0.1")).take(10).collect();
        let stats = summarize(0, &[], &costs).unwrap();
        assert_eq!(stats.total_revenue, Decimal::ONE);
    }

    #[test]
    fn revenue_past_decimal_range_is_an_error() {
        let costs = [dec("50000000000000000000000000000"); 2];
        let err = summarize(0, &[], &costs).unwrap_err();
        assert!(matches!(err, StatsError::RevenueOverflow));

        assert!(summarize(0, &[], &[Decimal::MAX, Decimal::ZERO]).is_ok());
    }

    #[tokio::test]
    async fn errors_propagate() {
        let source = FakeStats {
            statuses: vec![],
            costs: vec![],
            broken: true,
        };
        assert!(public_stats(&source).await.is_err());
        assert!(public_activity(&source).await.is_err());
    }

    #[tokio::test]
    async fn public_items_use_generic_wording() {
        let source = FakeStats {
            statuses: vec![],
            costs: vec![],
            broken: false,
        };
        let items = public_activity(&source).await.unwrap();
        assert_eq!(items[0].title, "New Service Added");
        assert_eq!(items[0].description, "Brake service for Ana's vehicle");
        assert_eq!(items[0].kind, ActivityKind::Service);
    }
}
