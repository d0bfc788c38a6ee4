use regex::Regex;
use tracing::{info, warn};

use crate::error::{OtaError, Result};
use crate::exec::{CommandRunner, CommandSpec};

/// Per-node command topic, e.g. `co2monitor/devA/down/forceota`.
pub fn command_topic(namespace: &str, node_id: &str) -> String {
    format!("{}/{}/down/forceota", namespace, node_id)
}

/// A node id must fill exactly one topic level: no separators, wildcards or
/// whitespace.
pub fn is_valid_node_id(node_id: &str) -> bool {
    if let Ok(re) = Regex::new(r"^[^/+#\s]+$") {
        return re.is_match(node_id);
    }
    false
}

/// Outcome of notifying a single node.
#[derive(Debug)]
pub struct NodeOutcome {
    pub node_id: String,
    pub topic: String,
    /// `Err` holds an [OtaError::Notification] for this node only
    pub result: Result<()>,
}

impl NodeOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Publishes OTA commands through `mosquitto_pub`.
pub struct Notifier<'a, R: CommandRunner + ?Sized> {
    runner: &'a R,
    broker: &'a str,
    namespace: &'a str,
}

impl<'a, R: CommandRunner + ?Sized> Notifier<'a, R> {
    pub fn new(runner: &'a R, broker: &'a str, namespace: &'a str) -> Self {
        Notifier {
            runner,
            broker,
            namespace,
        }
    }

    /// Notifies every node in order and collects one outcome per node.
    ///
    /// A failure for one node never stops the remaining ones, and nothing is
    /// retried.
    pub fn notify_all(&self, node_ids: &[String], payload: &str) -> Vec<NodeOutcome> {
        node_ids
            .iter()
            .map(|node_id| {
                let topic = command_topic(self.namespace, node_id);
                let result = self.notify(node_id, &topic, payload);

                match &result {
                    Ok(()) => info!(node = %node_id, topic = %topic, "OTA command published"),
                    Err(e) => warn!(node = %node_id, error = %e, "OTA command not delivered"),
                }

                NodeOutcome {
                    node_id: node_id.clone(),
                    topic,
                    result,
                }
            })
            .collect()
    }

    fn notify(&self, node_id: &str, topic: &str, payload: &str) -> Result<()> {
        if !is_valid_node_id(node_id) {
            return Err(OtaError::notification(format!(
                "invalid node id '{}'",
                node_id
            )));
        }

        let publish = CommandSpec::new("mosquitto_pub")
            .arg("-h")
            .arg(self.broker)
            .arg("-t")
            .arg(topic)
            .arg("-m")
            .arg(payload);

        let output = self.runner.run(&publish).map_err(|e| {
            OtaError::notification(format!("could not start mosquitto_pub: {}", e))
        })?;

        if !output.is_success() {
            return Err(OtaError::notification(format!(
                "publish to '{}' failed ({})",
                topic,
                output.describe_failure()
            )));
        }

        Ok(())
    }
}
