// Copyright 2025 The TopicRoute Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;

use topicroute_broker::topology::SAMPLE_TOPIC;
use topicroute_broker::MemorySink;
use topicroute_broker::TopicRouter;
use topicroute_broker::Topology;
use topicroute_common::Message;
use topicroute_common::PropertyValue;

fn order(color: &str, quantity: i64, priority: &str) -> Message {
    Message::new(format!(r#"{{"Color":"{color}","Quantity":{quantity},"Priority":"{priority}"}}"#))
        .with_correlation_id(priority)
        .with_subject(color)
        .with_property("color", color)
        .with_property("quantity", quantity)
        .with_property("priority", priority)
}

fn sample_orders() -> Vec<Message> {
    let mut orders = vec![Message::new("{}")];
    for (color, quantity, priority) in [
        ("blue", 5, "low"),
        ("red", 10, "high"),
        ("yellow", 5, "low"),
        ("blue", 10, "low"),
        ("blue", 5, "high"),
        ("blue", 10, "low"),
        ("red", 5, "low"),
        ("red", 10, "low"),
        ("red", 5, "low"),
        ("yellow", 10, "high"),
        ("yellow", 5, "low"),
        ("yellow", 10, "low"),
    ] {
        orders.push(order(color, quantity, priority));
    }
    orders
}

fn sample_router() -> TopicRouter {
    TopicRouter::from_topology(&Topology::sample()).unwrap()
}

#[test]
fn red_high_priority_order() {
    let router = sample_router();
    let message = order("red", 10, "high");

    let outcome = router.publish(SAMPLE_TOPIC, &message).unwrap();
    assert_eq!(outcome.matched(), vec!["AllOrders", "ColorRed", "HighPriorityRedOrders"]);

    let red = outcome.delivered_to("ColorRed").unwrap();
    assert_eq!(red.property("quantity"), Some(&PropertyValue::Int(5)));
    assert_eq!(red.property("priority"), None);
    assert_eq!(red.correlation_id().map(|v| v.as_str()), Some("low"));

    let high = outcome.delivered_to("HighPriorityRedOrders").unwrap();
    assert_eq!(high, &message);
    assert_eq!(outcome.delivered_to("AllOrders").unwrap(), &message);

    // The published message itself is never touched by actions.
    assert_eq!(message.property("quantity"), Some(&PropertyValue::Int(10)));
}

#[test]
fn blue_size_ten_order() {
    let router = sample_router();
    let outcome = router.publish(SAMPLE_TOPIC, &order("blue", 10, "low")).unwrap();
    assert_eq!(outcome.matched(), vec!["AllOrders", "ColorBlueSize10Orders"]);
}

#[test]
fn order_without_properties_reaches_only_catch_all() {
    let router = sample_router();
    let outcome = router.publish(SAMPLE_TOPIC, &Message::new("{}")).unwrap();
    assert_eq!(outcome.matched(), vec!["AllOrders"]);
    assert!(outcome.failures().is_empty());
}

#[tokio::test]
async fn batch_of_sample_orders() {
    let router = Arc::new(sample_router());
    let outcomes = router.publish_batch(SAMPLE_TOPIC, sample_orders()).await.unwrap();
    assert_eq!(outcomes.len(), 13);

    let count = |subscription: &str| {
        outcomes
            .iter()
            .filter(|outcome| outcome.delivered_to(subscription).is_some())
            .count()
    };
    assert_eq!(count("AllOrders"), 13);
    assert_eq!(count("ColorBlueSize10Orders"), 2);
    assert_eq!(count("ColorRed"), 4);
    assert_eq!(count("HighPriorityRedOrders"), 1);

    // Outcomes keep input order.
    assert_eq!(outcomes[2].matched(), vec!["AllOrders", "ColorRed", "HighPriorityRedOrders"]);
}

#[tokio::test]
async fn concurrent_publishers_share_router() {
    let router = Arc::new(sample_router());
    let handles: Vec<_> = sample_orders()
        .into_iter()
        .map(|message| {
            let router = router.clone();
            tokio::spawn(async move { router.publish(SAMPLE_TOPIC, &message).unwrap().len() })
        })
        .collect();

    let mut total = 0;
    for handle in handles {
        total += handle.await.unwrap();
    }
    assert_eq!(total, 13 + 2 + 4 + 1);
}

#[tokio::test]
async fn dispatch_into_memory_sink() {
    let router = sample_router();
    let sink = MemorySink::new();
    for message in sample_orders() {
        let summary = router.dispatch(SAMPLE_TOPIC, &message, &sink).await.unwrap();
        assert!(summary.sink_failures.is_empty());
        assert!(summary.evaluation_failures.is_empty());
    }

    assert_eq!(sink.len("AllOrders"), 13);
    assert_eq!(sink.len("ColorRed"), 4);
    let halved: Vec<_> = sink
        .messages("ColorRed")
        .iter()
        .map(|m| m.property("quantity").cloned())
        .collect();
    assert_eq!(
        halved,
        vec![
            Some(PropertyValue::Int(5)),
            Some(PropertyValue::Int(2)),
            Some(PropertyValue::Int(5)),
            Some(PropertyValue::Int(2)),
        ]
    );
}
