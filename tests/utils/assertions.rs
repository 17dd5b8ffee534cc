use serde_json::Value;

use super::mocks::Delivery;
use super::setup::{conn, TestSetup};

// ============================================================================
// Delivery Assertions
// ============================================================================

pub struct DeliveryAssertion<'a> {
    setup: &'a TestSetup,
    connections: Vec<String>,
}

impl<'a> DeliveryAssertion<'a> {
    pub fn for_connection(setup: &'a TestSetup, name: &str) -> Self {
        Self::for_connections(setup, &[name])
    }

    pub fn for_connections(setup: &'a TestSetup, names: &[&str]) -> Self {
        Self {
            setup,
            connections: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Each connection received exactly these (topic, envelope) pairs, in order
    pub async fn received_exactly(self, expected: &[(&str, Value)]) -> Self {
        let expected: Vec<Delivery> = expected
            .iter()
            .map(|(topic, envelope)| Delivery {
                topic: topic.to_string(),
                envelope: envelope.clone(),
            })
            .collect();

        for name in &self.connections {
            let delivered = self.setup.mock_conn_manager.deliveries_for(&conn(name)).await;
            assert_eq!(
                delivered, expected,
                "Connection {} received unexpected deliveries",
                name
            );
        }
        self
    }

    pub async fn received_nothing(self) -> Self {
        for name in &self.connections {
            let delivered = self.setup.mock_conn_manager.deliveries_for(&conn(name)).await;
            assert!(
                delivered.is_empty(),
                "Connection {} should not have received anything, got {:?}",
                name,
                delivered
            );
        }
        self
    }

    pub async fn received_count(self, count: usize) -> Self {
        for name in &self.connections {
            let delivered = self.setup.mock_conn_manager.deliveries_for(&conn(name)).await;
            assert_eq!(
                delivered.len(),
                count,
                "Connection {} received {} deliveries, expected {}",
                name,
                delivered.len(),
                count
            );
        }
        self
    }
}
