//! Bootstrap loader: the initial set of events
//!
//! Seeds `Event0..Event3` through the repository, so a failed put aborts the
//! whole batch with the same world-state error as any other write.

use ledger_core::{Key, LedgerContext, Result};
use tracing::info;

use crate::event::NewEvent;
use crate::repository::EventRepository;

fn seed(
    kind: &str,
    host: &str,
    target: &str,
    service_product: &str,
    min_price: i64,
    max_num: i64,
    expire_date: &str,
) -> NewEvent {
    NewEvent {
        kind: kind.to_string(),
        host: host.to_string(),
        target: target.to_string(),
        service_product: service_product.to_string(),
        min_price,
        max_num,
        expire_date: expire_date.to_string(),
    }
}

/// The seeded events keyed `Event0..Event3`
pub fn seed_events() -> Vec<(Key, NewEvent)> {
    let events = vec![
        seed("default", "starbucks", "caffe-latte", "banila-cookie_1,americano_1", 14000, 50, "2022-08-26"),
        seed("receipt", "seoul-milk", "milk", "cheese_10", 6000, 100, "2022-10-24"),
        seed("photo", "yellow-chicken", "snow-chicken", "cheese-ball_2,hotdog_1,coke_1", 19000, 0, "2022-09-01"),
        seed("text", "pizza-hut", "bulgogi-pizza,mozza-pizza", "coke_1,cheese-crust_1", 24000, 100, "2022-08-30"),
    ];
    events
        .into_iter()
        .enumerate()
        .map(|(i, event)| (Key::new(format!("Event{}", i)), event))
        .collect()
}

/// Register every seed event inside the ambient transaction
pub fn init_ledger<C: LedgerContext + ?Sized>(repository: &EventRepository, ctx: &mut C) -> Result<()> {
    let events = seed_events();
    let count = events.len();
    for (key, event) in events {
        repository.register_event(ctx, &key, event)?;
    }
    info!(target: "ledger::contract", count, "InitLedger seeded events");
    Ok(())
}
