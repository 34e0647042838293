//! Paging of large event lists into request-sized batches.
use serde_json::Value;

use crate::types::IngestionRequest;

/// Serialized size of a request carrying `customer_id` and no events.
fn envelope_bytes(customer_id: &str) -> usize {
    let empty = IngestionRequest {
        customer_id,
        events: &[],
    };
    // Worst case escapes every byte as `\u00XX`.
    serde_json::to_vec(&empty)
        .map(|v| v.len())
        .unwrap_or(customer_id.len() * 6 + 32)
}

/// Splits `events` into consecutive pages whose serialized request body,
/// sent for `customer_id`, stays within `max_bytes`.
///
/// Order is preserved. An event that alone exceeds the budget still gets a
/// page of its own so nothing is silently dropped; the endpoint decides what
/// to do with it.
pub fn chunk_events(events: Vec<Value>, max_bytes: usize, customer_id: &str) -> Vec<Vec<Value>> {
    let budget = max_bytes
        .saturating_sub(envelope_bytes(customer_id))
        .max(1);
    let mut pages = Vec::new();
    let mut current = Vec::new();
    let mut current_bytes = 0usize;

    for event in events {
        // serde_json::Value always serializes; fall back to 0 rather than panic.
        let size = serde_json::to_vec(&event).map(|v| v.len()).unwrap_or(0);
        // +1 for the separating comma.
        let needed = size + usize::from(!current.is_empty());
        if !current.is_empty() && current_bytes + needed > budget {
            pages.push(std::mem::take(&mut current));
            current_bytes = 0;
        }
        current_bytes += size + usize::from(!current.is_empty());
        current.push(event);
    }

    if !current.is_empty() {
        pages.push(current);
    }
    pages
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn event(n: usize, pad: usize) -> Value {
        json!({"id": n, "pad": "x".repeat(pad)})
    }

    #[test]
    fn empty_input_yields_no_pages() {
        assert!(chunk_events(Vec::new(), 1024, "c").is_empty());
    }

    #[test]
    fn small_batches_stay_together() {
        let events: Vec<Value> = (0..10).map(|n| event(n, 4)).collect();
        let pages = chunk_events(events.clone(), 1024 * 1024, "c");
        assert_eq!(pages, vec![events]);
    }

    #[test]
    fn pages_respect_the_limit_and_keep_order() {
        let events: Vec<Value> = (0..50).map(|n| event(n, 100)).collect();
        let limit = 1024;
        let pages = chunk_events(events.clone(), limit, "c");
        assert!(pages.len() > 1);

        for page in &pages {
            let body = json!({"customer_id": "c", "events": page});
            assert!(serde_json::to_vec(&body).unwrap().len() <= limit);
        }

        let flattened: Vec<Value> = pages.into_iter().flatten().collect();
        assert_eq!(flattened, events);
    }

    #[test]
    fn oversized_event_gets_its_own_page() {
        let events = vec![event(0, 4), event(1, 5000), event(2, 4)];
        let pages = chunk_events(events, 1024, "c");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[1][0]["id"], 1);
    }

    #[test]
    fn long_customer_id_counts_against_the_limit() {
        let customer_id = "c".repeat(300);
        let events: Vec<Value> = (0..40).map(|n| event(n, 60)).collect();
        let limit = 1024;
        let pages = chunk_events(events.clone(), limit, &customer_id);
        assert!(pages.len() > 1);

        for page in &pages {
            let body = IngestionRequest {
                customer_id: &customer_id,
                events: page,
            };
            assert!(serde_json::to_vec(&body).unwrap().len() <= limit);
        }
        assert_eq!(pages.into_iter().flatten().collect::<Vec<_>>(), events);
    }
}
