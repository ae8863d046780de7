//! Channel/operation normalization.
//!
//! Turns a list of denormalized per-operation descriptors into the
//! deduplicated, cross-referenced `channels` and `operations` maps of an
//! AsyncAPI 3.0 document. Messages are embedded directly in their owning
//! channel and operations point at them through JSON References.
//!
//! The transformation is deterministic for a given input order: channels
//! appear in first-seen address order, and within a channel all send
//! operations precede all receive operations, each in original descriptor
//! order.

use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;

use crate::descriptor::{OperationDescriptor, OperationRecord};
use crate::document::{Channel, Message, Operation, OperationAction, Reference};
use crate::error::{Error, Result};

/// Output of [`ChannelTransformer::normalize_channels`]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedChannels {
    /// Channels keyed by sanitized channel id
    pub channels: IndexMap<String, Channel>,
    /// Operations keyed by operation id
    pub operations: IndexMap<String, Operation>,
}

/// Per-address accumulator used while grouping descriptors
struct ChannelGroup<'a> {
    description: Option<String>,
    bindings: IndexMap<String, Value>,
    parameters: IndexMap<String, Value>,
    /// Collected messages keyed by their raw (pre-sanitization) name
    messages: IndexMap<String, Message>,
    send_records: Vec<&'a OperationRecord>,
    receive_records: Vec<&'a OperationRecord>,
}

/// Normalizes denormalized operation descriptors into AsyncAPI 3.0 form.
pub struct ChannelTransformer;

impl ChannelTransformer {
    /// Groups descriptors by channel address and builds the `channels` and
    /// `operations` maps of an AsyncAPI 3.0 document.
    ///
    /// Channel metadata and duplicate message names are first-write-wins.
    /// Two distinct addresses sanitizing to the same channel id, or two
    /// operations producing the same operation id, are rejected.
    pub fn normalize_channels(descriptors: &[OperationDescriptor]) -> Result<NormalizedChannels> {
        debug!("Normalizing {} descriptors", descriptors.len());

        let mut groups: IndexMap<String, ChannelGroup> = IndexMap::new();

        for descriptor in descriptors {
            let address = descriptor.root.name.as_str();
            if address.is_empty() {
                debug!("Skipping descriptor without a channel address");
                continue;
            }

            // First descriptor for an address seeds the channel metadata
            let group = groups
                .entry(address.to_string())
                .or_insert_with(|| ChannelGroup {
                    description: descriptor.root.description.clone(),
                    bindings: descriptor.root.bindings.clone(),
                    parameters: descriptor.root.parameters.clone(),
                    messages: IndexMap::new(),
                    send_records: Vec::new(),
                    receive_records: Vec::new(),
                });

            if let Some(record) = &descriptor.operations.publish {
                Self::collect_messages(address, record, &mut group.messages);
                group.send_records.push(record);
            }

            if let Some(record) = &descriptor.operations.subscribe {
                Self::collect_messages(address, record, &mut group.messages);
                group.receive_records.push(record);
            }
        }

        let mut channels: IndexMap<String, Channel> = IndexMap::new();
        let mut operations: IndexMap<String, Operation> = IndexMap::new();

        for (address, group) in &groups {
            let channel_id = Self::address_to_channel_id(address);

            if let Some(existing) = channels.get(&channel_id) {
                return Err(Error::ChannelIdCollision {
                    id: channel_id,
                    first: existing.address.clone(),
                    second: address.clone(),
                });
            }

            debug!("Building channel '{}' for address '{}'", channel_id, address);
            channels.insert(channel_id.clone(), Self::build_channel(address, group));

            for (index, record) in group.send_records.iter().enumerate() {
                let operation_id = Self::build_operation_id(
                    record,
                    &channel_id,
                    OperationAction::Send,
                    index,
                    group.send_records.len(),
                );
                let operation = Self::build_operation(
                    OperationAction::Send,
                    &channel_id,
                    record,
                    &group.messages,
                );
                if operations.insert(operation_id.clone(), operation).is_some() {
                    return Err(Error::DuplicateOperationId(operation_id));
                }
            }

            for (index, record) in group.receive_records.iter().enumerate() {
                let operation_id = Self::build_operation_id(
                    record,
                    &channel_id,
                    OperationAction::Receive,
                    index,
                    group.receive_records.len(),
                );
                let operation = Self::build_operation(
                    OperationAction::Receive,
                    &channel_id,
                    record,
                    &group.messages,
                );
                if operations.insert(operation_id.clone(), operation).is_some() {
                    return Err(Error::DuplicateOperationId(operation_id));
                }
            }
        }

        debug!(
            "Normalized into {} channels and {} operations",
            channels.len(),
            operations.len()
        );

        Ok(NormalizedChannels {
            channels,
            operations,
        })
    }

    /// Converts a channel address to a valid channel id by replacing every
    /// character outside `[A-Za-z0-9_]` with an underscore.
    fn address_to_channel_id(address: &str) -> String {
        address
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Sanitizes a message name for use in JSON references: `#` and
    /// whitespace become underscores.
    fn sanitize_message_name(name: &str) -> String {
        name.chars()
            .map(|c| if c == '#' || c.is_whitespace() { '_' } else { c })
            .collect()
    }

    /// Harvests the messages of one operation record into the channel's
    /// message map, keyed by raw name, first-write-wins.
    fn collect_messages(
        address: &str,
        record: &OperationRecord,
        messages: &mut IndexMap<String, Message>,
    ) {
        let Some(spec) = &record.message else {
            return;
        };

        for message in spec.members() {
            let Some(name) = Self::message_name(message) else {
                continue;
            };

            match messages.get(name) {
                None => {
                    messages.insert(name.to_string(), message.clone());
                }
                Some(existing) if existing != message => {
                    warn!(
                        "Channel '{}': duplicate message name '{}' with a different body, keeping the first",
                        address, name
                    );
                }
                Some(_) => {}
            }
        }
    }

    /// A message's non-empty name, used as its dedup key.
    fn message_name(message: &Message) -> Option<&str> {
        message.name.as_deref().filter(|name| !name.is_empty())
    }

    /// Unique operation id: the explicit one verbatim if present, else
    /// `{channelId}_{action}` with a 0-based index suffix when the channel
    /// has more than one operation of that action.
    fn build_operation_id(
        record: &OperationRecord,
        channel_id: &str,
        action: OperationAction,
        index: usize,
        total: usize,
    ) -> String {
        if let Some(operation_id) = &record.operation_id {
            return operation_id.clone();
        }
        if total > 1 {
            format!("{}_{}_{}", channel_id, action.as_str(), index)
        } else {
            format!("{}_{}", channel_id, action.as_str())
        }
    }

    /// Builds the channel object, embedding its messages under sanitized
    /// names. A message's internal `name` field is rewritten to match its
    /// sanitized key.
    fn build_channel(address: &str, group: &ChannelGroup) -> Channel {
        let mut embedded: IndexMap<String, Message> = IndexMap::new();
        for (raw_name, message) in &group.messages {
            let sanitized = Self::sanitize_message_name(raw_name);
            let mut message = message.clone();
            if message.name.is_some() {
                message.name = Some(sanitized.clone());
            }
            embedded.insert(sanitized, message);
        }

        Channel {
            address: address.to_string(),
            description: group.description.clone(),
            messages: embedded,
            parameters: group.parameters.clone(),
            bindings: group.bindings.clone(),
        }
    }

    /// Builds one operation object with its channel and message references.
    fn build_operation(
        action: OperationAction,
        channel_id: &str,
        record: &OperationRecord,
        channel_messages: &IndexMap<String, Message>,
    ) -> Operation {
        Operation {
            action,
            channel: Reference::channel(channel_id),
            summary: record.summary.clone(),
            description: record.description.clone(),
            tags: record.tags.clone(),
            external_docs: record.external_docs.clone(),
            bindings: record.bindings.clone(),
            messages: Self::build_message_references(record, channel_id, channel_messages),
        }
    }

    /// Resolves the record's message spec against the channel's message map
    /// by raw name, in declared order. Names not present in the map are
    /// silently skipped.
    fn build_message_references(
        record: &OperationRecord,
        channel_id: &str,
        channel_messages: &IndexMap<String, Message>,
    ) -> Vec<Reference> {
        let Some(spec) = &record.message else {
            return Vec::new();
        };

        spec.members()
            .iter()
            .filter_map(Self::message_name)
            .filter(|name| channel_messages.contains_key(*name))
            .map(|name| {
                Reference::channel_message(channel_id, &Self::sanitize_message_name(name))
            })
            .collect()
    }
}
