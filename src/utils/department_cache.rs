use anyhow::Result;
use futures_util::StreamExt;
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::time::Duration;

/// employee id -> department id, for the create form's reactive field:
/// picking an employee fills in the department without a join per request.
pub static DEPARTMENT_CACHE: Lazy<Cache<u64, u64>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(500_000) // tune based on memory
        .time_to_live(Duration::from_secs(86400)) // 24h TTL
        .build()
});

/// Record a single employee's department.
pub async fn mark(employee_id: u64, department_id: u64) {
    DEPARTMENT_CACHE.insert(employee_id, department_id).await;
}

/// Cached department for an employee, if known.
pub async fn get(employee_id: u64) -> Option<u64> {
    DEPARTMENT_CACHE.get(&employee_id).await
}

/// Batch insert employee -> department pairs.
async fn batch_mark(pairs: &[(u64, u64)]) {
    let futures: Vec<_> = pairs
        .iter()
        .map(|(employee_id, department_id)| DEPARTMENT_CACHE.insert(*employee_id, *department_id))
        .collect();

    // Await all insertions concurrently
    futures::future::join_all(futures).await;
}

/// Load every employee's department into the in-memory cache (batched).
pub async fn warmup_department_cache(pool: &MySqlPool, batch_size: usize) -> Result<()> {
    let mut stream = sqlx::query_as::<_, (u64, u64)>(
        r#"
        SELECT id, department_id
        FROM employees
        ORDER BY id
        "#,
    )
    .fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total_count = 0usize;

    while let Some(row) = stream.next().await {
        let (employee_id, department_id) = row?;
        batch.push((employee_id, department_id));
        total_count += 1;

        if batch.len() >= batch_size {
            batch_mark(&batch).await;
            batch.clear();
        }
    }

    // Insert any remaining pairs
    if !batch.is_empty() {
        batch_mark(&batch).await;
    }

    log::info!(
        "Department cache warmup complete: {} employees",
        total_count
    );

    Ok(())
}
