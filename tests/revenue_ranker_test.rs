use rales_engine::{
    CustomerId, Invoice, InvoiceId, InvoiceItem, InvoiceItemId, Item, ItemId, MemoryStore,
    Merchant, MerchantId, Money, RankLimit, RankingError, RevenueRanker, StoreError, Transaction,
    TransactionId, TransactionResult,
};

use TransactionResult::{Failed, Success};

/// Builds a MemoryStore; each merchant gets one item with the same id.
#[derive(Default)]
struct StoreBuilder {
    store: MemoryStore,
    next_id: i64,
}

impl StoreBuilder {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn merchant(mut self, id: i64) -> Self {
        let merchant_id = MerchantId::new(id);
        self.store = self
            .store
            .with_merchant(Merchant::new(merchant_id, format!("Merchant {}", id)))
            .with_item(Item::new(
                ItemId::new(id),
                "Item",
                "A thing",
                Money::from_minor(100),
                merchant_id,
            ));
        self
    }

    fn invoice(mut self, merchant: i64, total: i64, results: &[TransactionResult]) -> Self {
        let invoice_id = InvoiceId::new(self.next_id());
        let line_id = InvoiceItemId::new(self.next_id());
        self.store = self
            .store
            .with_invoice(Invoice::new(
                invoice_id,
                CustomerId::new(1),
                MerchantId::new(merchant),
                "shipped",
            ))
            .with_invoice_item(InvoiceItem::new(
                line_id,
                invoice_id,
                ItemId::new(merchant),
                1,
                Money::from_minor(total),
            ));
        for result in results {
            let tx_id = TransactionId::new(self.next_id());
            self.store = self
                .store
                .with_transaction(Transaction::new(tx_id, invoice_id, *result));
        }
        self
    }

    fn build(self) -> MemoryStore {
        self.store
    }
}

fn summary(ranked: &[rales_engine::MerchantRevenue]) -> Vec<(i64, i64)> {
    ranked
        .iter()
        .map(|r| (r.merchant.id.as_i64(), r.revenue.minor()))
        .collect()
}

#[tokio::test]
async fn test_scenario_paid_and_failed_merchants() {
    let store = StoreBuilder::default()
        .merchant(1)
        .merchant(2)
        .invoice(1, 500, &[Success])
        .invoice(2, 1000, &[Failed])
        .build();

    let ranked = RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::new(5).unwrap())
        .await
        .unwrap();
    assert_eq!(summary(&ranked), vec![(1, 500)]);
}

#[tokio::test]
async fn test_scenario_two_invoices_rank_first() {
    let store = StoreBuilder::default()
        .merchant(1)
        .merchant(2)
        .merchant(3)
        .invoice(1, 500, &[Success])
        .invoice(2, 1000, &[Failed])
        .invoice(3, 300, &[Success])
        .invoice(3, 300, &[Success])
        .build();

    let ranked = RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
        .unwrap();
    assert_eq!(summary(&ranked), vec![(3, 600), (1, 500)]);
}

#[tokio::test]
async fn test_scenario_tie_lists_lower_id_first() {
    let store = StoreBuilder::default()
        .merchant(7)
        .merchant(3)
        .invoice(7, 400, &[Success])
        .invoice(3, 400, &[Success])
        .build();

    let ranked = RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
        .unwrap();
    assert_eq!(summary(&ranked), vec![(3, 400), (7, 400)]);
}

#[tokio::test]
async fn test_no_eligible_invoices_is_empty_not_error() {
    let store = StoreBuilder::default()
        .merchant(1)
        .invoice(1, 900, &[])
        .invoice(1, 900, &[Failed, Failed])
        .build();

    let ranked = RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
        .unwrap();
    assert!(ranked.is_empty());

    let empty = MemoryStore::new();
    let ranked = RevenueRanker::new(&empty)
        .top_merchants_by_revenue(RankLimit::default())
        .await
        .unwrap();
    assert!(ranked.is_empty());
}

#[tokio::test]
async fn test_output_is_bounded_and_non_increasing() {
    let mut builder = StoreBuilder::default();
    for (id, total) in [(1, 300), (2, 900), (3, 300), (4, 100), (5, 900), (6, 50)] {
        builder = builder.merchant(id).invoice(id, total, &[Success]);
    }
    let store = builder.build();
    let ranker = RevenueRanker::new(&store);

    for n in 1..=8 {
        let ranked = ranker
            .top_merchants_by_revenue(RankLimit::new(n).unwrap())
            .await
            .unwrap();
        assert!(ranked.len() <= n as usize);
        for pair in ranked.windows(2) {
            assert!(pair[0].revenue >= pair[1].revenue);
            if pair[0].revenue == pair[1].revenue {
                assert!(pair[0].merchant.id < pair[1].merchant.id);
            }
        }
    }

    let all = ranker
        .top_merchants_by_revenue(RankLimit::new(100).unwrap())
        .await
        .unwrap();
    assert_eq!(
        summary(&all),
        vec![(2, 900), (5, 900), (1, 300), (3, 300), (4, 100), (6, 50)]
    );
}

#[tokio::test]
async fn test_store_failure_is_data_unavailable() {
    let store = StoreBuilder::default()
        .merchant(1)
        .invoice(1, 500, &[Success])
        .build()
        .with_failure(StoreError::Unavailable("database is locked".to_string()));

    let err = RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        RankingError::DataUnavailable("database is locked".to_string())
    );
}

#[tokio::test]
async fn test_missing_item_aborts_ranking() {
    let store = StoreBuilder::default()
        .merchant(1)
        .invoice(1, 500, &[Success])
        .build()
        .with_invoice_item(InvoiceItem::new(
            InvoiceItemId::new(500),
            InvoiceId::new(1),
            ItemId::new(404),
            1,
            Money::from_minor(100),
        ));

    match RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
    {
        Err(RankingError::DataIntegrityViolation { record, .. }) => {
            assert_eq!(record, "invoice_item 500");
        }
        other => panic!("Expected DataIntegrityViolation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_merchant_revenue_lookup() {
    let store = StoreBuilder::default()
        .merchant(1)
        .merchant(2)
        .invoice(1, 500, &[Failed, Success, Success])
        .invoice(2, 1000, &[Failed])
        .build();
    let ranker = RevenueRanker::new(&store);

    let a = ranker
        .merchant_revenue(MerchantId::new(1))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(a.revenue.minor(), 500);

    let b = ranker
        .merchant_revenue(MerchantId::new(2))
        .await
        .unwrap()
        .unwrap();
    assert!(b.revenue.is_zero());

    assert!(ranker
        .merchant_revenue(MerchantId::new(3))
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_repeated_invoice_item_aborts_ranking() {
    let line = InvoiceItem::new(
        InvoiceItemId::new(5),
        InvoiceId::new(1),
        ItemId::new(1),
        1,
        Money::from_minor(500),
    );
    let store = MemoryStore::new()
        .with_merchant(Merchant::new(MerchantId::new(1), "A"))
        .with_item(Item::new(
            ItemId::new(1),
            "Item",
            "A thing",
            Money::from_minor(500),
            MerchantId::new(1),
        ))
        .with_invoice(Invoice::new(
            InvoiceId::new(1),
            CustomerId::new(1),
            MerchantId::new(1),
            "shipped",
        ))
        .with_invoice_item(line.clone())
        .with_invoice_item(line)
        .with_transaction(Transaction::new(
            TransactionId::new(1),
            InvoiceId::new(1),
            Success,
        ));

    match RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
    {
        Err(RankingError::DataIntegrityViolation { record, reason }) => {
            assert_eq!(record, "invoice_item 5");
            assert_eq!(reason, "duplicate invoice_item id");
        }
        other => panic!("Expected DataIntegrityViolation, got {:?}", other),
    }
}

#[tokio::test]
async fn test_negative_item_price_aborts_ranking() {
    let store = MemoryStore::new()
        .with_merchant(Merchant::new(MerchantId::new(1), "A"))
        .with_item(Item::new(
            ItemId::new(1),
            "Item",
            "A thing",
            Money::from_minor(-100),
            MerchantId::new(1),
        ))
        .with_invoice(Invoice::new(
            InvoiceId::new(1),
            CustomerId::new(1),
            MerchantId::new(1),
            "shipped",
        ))
        .with_invoice_item(InvoiceItem::new(
            InvoiceItemId::new(5),
            InvoiceId::new(1),
            ItemId::new(1),
            1,
            Money::from_minor(500),
        ))
        .with_transaction(Transaction::new(
            TransactionId::new(1),
            InvoiceId::new(1),
            Success,
        ));

    match RevenueRanker::new(&store)
        .top_merchants_by_revenue(RankLimit::default())
        .await
    {
        Err(RankingError::DataIntegrityViolation { record, .. }) => {
            assert_eq!(record, "item 1");
        }
        other => panic!("Expected DataIntegrityViolation, got {:?}", other),
    }
}
