//! PostgreSQL record store test.
//!
//! The connection-failure check always runs. The rest needs a disposable
//! database in `DATABASE_URL` (it truncates `record_store`) and is skipped
//! when the variable is unset.

use product_catalog::storage::{PostgresStore, RecordStore, StoreCredentials, StoreError};
use product_catalog::{Product, ProductRepository};
use std::collections::HashSet;
use std::sync::Arc;

async fn store_from_env() -> Result<Option<PostgresStore>, Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL store test");
        return Ok(None);
    };
    let store = PostgresStore::connect_url(&url).await?;
    store.flush_all().await?;
    Ok(Some(store))
}

#[tokio::test]
async fn test_unreachable_store_is_a_connection_error() {
    let credentials = StoreCredentials {
        username: "postgres".to_string(),
        password: None,
        database: "postgres".to_string(),
    };
    // Port 1 on loopback refuses connections.
    let err = match PostgresStore::connect("127.0.0.1", 1, &credentials).await {
        Ok(_) => panic!("connecting to a closed port should fail"),
        Err(e) => e,
    };
    assert!(err.is_connection(), "unexpected error: {:?}", err);
    assert!(matches!(err, StoreError::Connection { .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_postgres_store() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = store_from_env().await? else {
        return Ok(());
    };

    store.ping().await?;
    assert!(store.get("1").await?.is_none());

    store.set("1", b"first".to_vec()).await?;
    store.set("1", b"second".to_vec()).await?;
    assert_eq!(store.get("1").await?, Some(b"second".to_vec()));
    assert!(store.exists("1").await?);

    assert_eq!(store.increment("index").await?, 1);
    assert_eq!(store.increment("index").await?, 2);

    let keys: HashSet<String> = store.keys().await?.into_iter().collect();
    assert_eq!(keys, HashSet::from(["1".to_string(), "index".to_string()]));

    store.delete("1").await?;
    store.delete("1").await?;
    assert!(!store.exists("1").await?);

    store.flush_all().await?;
    assert!(store.keys().await?.is_empty());

    // Concurrent saves through the repository.
    let repo = ProductRepository::new(Arc::new(store));

    let mut handles = Vec::new();
    for i in 0..40 {
        let repo = repo.clone();
        handles.push(tokio::spawn(async move {
            repo.save(Product::new(format!("p{}", i), "Bulk", 2.5, "Used", "Grey", 3))
                .await
        }));
    }
    let mut ids = HashSet::new();
    for handle in handles {
        assert!(ids.insert(handle.await??.id));
    }
    assert_eq!(ids, (1..=40).collect::<HashSet<u64>>());

    let found = repo.find(17).await?.expect("product 17 stored");
    assert_eq!(found.category, "Bulk");
    assert_eq!(repo.find_by_category("bulk").await?.len(), 40);

    repo.remove_all().await?;
    let next = repo.save(Product::new("again", "Bulk", 1.0, "Used", "Grey", 1)).await?;
    assert_eq!(next.id, 1);
    Ok(())
}
