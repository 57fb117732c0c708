/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use broker_control::{
    ConnectionControl, ControlAdapter, ControlIterator, ControlResult, EngineControl,
    QueueControl, Reliability, RemoteQueuePointControl, RemoteTopicSpaceControl, StreamControl,
    StreamState, TopicSpaceControl,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const COMPONENT: &str = "report";

#[derive(Serialize, Debug)]
pub struct InspectionReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub engine: EngineReport,
    pub destinations: Vec<DestinationReport>,
    pub topic_spaces: Vec<TopicSpaceReport>,
    pub connections: Vec<ConnectionReport>,
    pub totals: Totals,
}

#[derive(Serialize, Debug)]
pub struct EngineReport {
    pub uuid: String,
    pub name: String,
}

#[derive(Serialize, Debug)]
pub struct DestinationReport {
    pub id: String,
    pub name: String,
    pub depth: u64,
    pub high_water_mark: u64,
    pub created_at: DateTime<Utc>,
    pub remote_queue_points: Vec<RemoteQueuePointReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct RemoteQueuePointReport {
    pub remote_engine: String,
    pub messages_in_flight: u64,
    pub messages_sent: u64,
    pub has_stream_set: bool,
    pub streams: Vec<StreamReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct StreamReport {
    pub stream_id: String,
    pub priority: u8,
    pub reliability: Reliability,
    pub state: StreamState,
    pub messages_sent: u64,
    pub messages_acknowledged: u64,
}

#[derive(Serialize, Debug)]
pub struct TopicSpaceReport {
    pub id: String,
    pub name: String,
    pub subscriptions: u64,
    pub remote_topic_spaces: Vec<RemoteTopicSpaceReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct RemoteTopicSpaceReport {
    pub remote_engine: String,
    /// Peer side currently supplying the relationship's identity.
    pub identity: String,
    pub messages_published: u64,
    pub messages_consumed: u64,
}

#[derive(Serialize, Debug)]
pub struct ConnectionReport {
    pub id: String,
    pub client_id: String,
    pub connected_at: DateTime<Utc>,
    pub messages_received: u64,
    pub messages_sent: u64,
}

/// Counts taken through the flattened engine-wide cursors.
#[derive(Serialize, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub destinations: usize,
    pub remote_queue_points: usize,
    pub streams: usize,
    pub topic_spaces: usize,
    pub connections: usize,
}

/// Walks every traversal the engine adapter offers.
pub fn inspect(engine: &EngineControl) -> ControlResult<InspectionReport> {
    let mut destinations = Vec::new();
    drain(engine.destinations()?, |queue| {
        destinations.push(destination_report(&queue)?);
        Ok(())
    })?;

    let mut topic_spaces = Vec::new();
    drain(engine.topic_spaces()?, |topic_space| {
        topic_spaces.push(topic_space_report(&topic_space)?);
        Ok(())
    })?;

    let mut connections = Vec::new();
    drain(engine.connections()?, |connection| {
        connections.push(connection_report(&connection)?);
        Ok(())
    })?;

    let mut totals = Totals {
        destinations: destinations.len(),
        topic_spaces: topic_spaces.len(),
        connections: connections.len(),
        ..Totals::default()
    };
    drain(engine.remote_queue_points()?, |_| {
        totals.remote_queue_points += 1;
        Ok(())
    })?;
    let mut streams = 0;
    drain(engine.destinations()?, |queue| {
        // Destinations with an unreadable point index contribute no streams.
        if let Ok(cursor) = queue.streams() {
            drain(cursor, |_| {
                streams += 1;
                Ok(())
            })?;
        }
        Ok(())
    })?;
    totals.streams = streams;

    debug!(
        component = COMPONENT,
        destinations = totals.destinations,
        remote_queue_points = totals.remote_queue_points,
        "inspection complete"
    );

    Ok(InspectionReport {
        report_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now(),
        engine: EngineReport {
            uuid: engine.uuid()?.to_string(),
            name: engine.name()?.to_string(),
        },
        destinations,
        topic_spaces,
        connections,
        totals,
    })
}

/// Visits every element, then finishes the cursor even when `visit` failed.
fn drain<C, F>(mut cursor: C, mut visit: F) -> ControlResult<()>
where
    C: ControlIterator,
    F: FnMut(C::Item) -> ControlResult<()>,
{
    let mut outcome = Ok(());
    while cursor.has_next() {
        match cursor.try_next().and_then(&mut visit) {
            Ok(()) => {}
            Err(err) => {
                outcome = Err(err);
                break;
            }
        }
    }
    cursor.finished();
    outcome
}

fn destination_report(queue: &Arc<QueueControl>) -> ControlResult<DestinationReport> {
    let mut remote_queue_points = Vec::new();
    let error = match queue.remote_queue_points() {
        Ok(cursor) => {
            drain(cursor, |point| {
                remote_queue_points.push(remote_queue_point_report(&point)?);
                Ok(())
            })?;
            None
        }
        Err(err) => Some(err.to_string()),
    };

    Ok(DestinationReport {
        id: queue.id()?.to_string(),
        name: queue.name()?.to_string(),
        depth: queue.depth()?,
        high_water_mark: queue.high_water_mark()?,
        created_at: queue.created_at()?,
        remote_queue_points,
        error,
    })
}

fn remote_queue_point_report(
    point: &Arc<RemoteQueuePointControl>,
) -> ControlResult<RemoteQueuePointReport> {
    let mut streams = Vec::new();
    let (has_stream_set, error) = match point.stream_set() {
        Ok(stream_set) => match stream_set.streams() {
            Ok(cursor) => {
                drain(cursor, |stream| {
                    streams.push(stream_report(&stream)?);
                    Ok(())
                })?;
                (true, None)
            }
            Err(err) => (true, Some(err.to_string())),
        },
        // A point without a stream set carries best-effort traffic only.
        Err(_) => (false, None),
    };

    Ok(RemoteQueuePointReport {
        remote_engine: point
            .remote_engine()
            .map(|uuid| uuid.to_string())
            .unwrap_or_default(),
        messages_in_flight: point.messages_in_flight()?,
        messages_sent: point.messages_sent()?,
        has_stream_set,
        streams,
        error,
    })
}

fn stream_report(stream: &Arc<StreamControl>) -> ControlResult<StreamReport> {
    Ok(StreamReport {
        stream_id: stream.stream_id()?.to_string(),
        priority: stream.priority()?,
        reliability: stream.reliability()?,
        state: stream.stream_state()?,
        messages_sent: stream.messages_sent()?,
        messages_acknowledged: stream.messages_acknowledged()?,
    })
}

fn topic_space_report(topic_space: &Arc<TopicSpaceControl>) -> ControlResult<TopicSpaceReport> {
    let mut remote_topic_spaces = Vec::new();
    let error = match topic_space.remote_topic_spaces() {
        Ok(cursor) => {
            drain(cursor, |remote| {
                remote_topic_spaces.push(remote_topic_space_report(&remote)?);
                Ok(())
            })?;
            None
        }
        Err(err) => Some(err.to_string()),
    };

    Ok(TopicSpaceReport {
        id: topic_space.id()?.to_string(),
        name: topic_space.name()?.to_string(),
        subscriptions: topic_space.subscription_count()?,
        remote_topic_spaces,
        error,
    })
}

fn remote_topic_space_report(
    remote: &Arc<RemoteTopicSpaceControl>,
) -> ControlResult<RemoteTopicSpaceReport> {
    Ok(RemoteTopicSpaceReport {
        remote_engine: remote
            .remote_engine()
            .map(|uuid| uuid.to_string())
            .unwrap_or_default(),
        identity: remote.exposed_identity()?.id,
        messages_published: remote.messages_published()?,
        messages_consumed: remote.messages_consumed()?,
    })
}

fn connection_report(connection: &Arc<ConnectionControl>) -> ControlResult<ConnectionReport> {
    Ok(ConnectionReport {
        id: connection.id()?.to_string(),
        client_id: connection.client_id()?,
        connected_at: connection.connected_at()?,
        messages_received: connection.messages_received()?,
        messages_sent: connection.messages_sent()?,
    })
}

/// Plain-text rendering for terminals.
pub fn render_text(report: &InspectionReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "engine {} ({}) report {} at {}",
        report.engine.name,
        report.engine.uuid,
        report.report_id,
        report.generated_at.to_rfc3339()
    );

    for destination in &report.destinations {
        let _ = writeln!(
            out,
            "destination {} [{}] depth={} hwm={}",
            destination.name, destination.id, destination.depth, destination.high_water_mark
        );
        if let Some(error) = &destination.error {
            let _ = writeln!(out, "  ! {error}");
        }
        for point in &destination.remote_queue_points {
            let _ = writeln!(
                out,
                "  remote queue point -> {} in_flight={} sent={}",
                point.remote_engine, point.messages_in_flight, point.messages_sent
            );
            if let Some(error) = &point.error {
                let _ = writeln!(out, "    ! {error}");
            }
            for stream in &point.streams {
                let _ = writeln!(
                    out,
                    "    stream {} priority={} sent={} acked={}",
                    stream.stream_id,
                    stream.priority,
                    stream.messages_sent,
                    stream.messages_acknowledged
                );
            }
        }
    }

    for topic_space in &report.topic_spaces {
        let _ = writeln!(
            out,
            "topic space {} [{}] subscriptions={}",
            topic_space.name, topic_space.id, topic_space.subscriptions
        );
        if let Some(error) = &topic_space.error {
            let _ = writeln!(out, "  ! {error}");
        }
        for remote in &topic_space.remote_topic_spaces {
            let _ = writeln!(
                out,
                "  remote topic space -> {} via {} published={} consumed={}",
                remote.remote_engine,
                remote.identity,
                remote.messages_published,
                remote.messages_consumed
            );
        }
    }

    for connection in &report.connections {
        let _ = writeln!(
            out,
            "connection {} client={} received={} sent={}",
            connection.id,
            connection.client_id,
            connection.messages_received,
            connection.messages_sent
        );
    }

    let totals = &report.totals;
    let _ = writeln!(
        out,
        "totals: destinations={} remote_queue_points={} streams={} topic_spaces={} connections={}",
        totals.destinations,
        totals.remote_queue_points,
        totals.streams,
        totals.topic_spaces,
        totals.connections
    );
    out
}

#[cfg(test)]
mod tests {
    use super::{inspect, render_text, Totals};
    use broker_control::ControlConfig;
    use static_topology::StaticTopology;

    const FIXTURE: &str = "../utils/static-topology/static-configs/topology.json5";

    #[test]
    fn fixture_totals_come_from_flattened_cursors() {
        let topology =
            StaticTopology::load(FIXTURE, &ControlConfig::default(), None).expect("fixture loads");
        let engine = topology.engine_control().expect("engine adapter");

        let report = inspect(&engine).expect("inspection succeeds");

        assert_eq!(
            report.totals,
            Totals {
                destinations: 4,
                remote_queue_points: 4,
                streams: 3,
                topic_spaces: 2,
                connections: 2,
            }
        );
        let billing = report
            .destinations
            .iter()
            .find(|destination| destination.name == "billing")
            .expect("billing reported");
        assert!(billing.error.is_some());
        assert_eq!(topology.engine().cursor_ledger().open(), 0);
    }

    #[test]
    fn remote_topic_space_identity_follows_first_attached_side() {
        let topology =
            StaticTopology::load(FIXTURE, &ControlConfig::default(), None).expect("fixture loads");
        let report = inspect(&topology.engine_control().expect("engine adapter"))
            .expect("inspection succeeds");

        let prices = &report.topic_spaces[0];
        assert_eq!(prices.name, "prices");
        assert_eq!(
            prices.remote_topic_spaces[0].identity,
            "prices@00000000000000B2/primary"
        );
        assert_eq!(
            prices.remote_topic_spaces[1].identity,
            "prices@00000000000000C3/secondary"
        );
    }

    #[test]
    fn text_rendering_mentions_every_destination() {
        let topology =
            StaticTopology::load(FIXTURE, &ControlConfig::default(), None).expect("fixture loads");
        let report = inspect(&topology.engine_control().expect("engine adapter"))
            .expect("inspection succeeds");

        let text = render_text(&report);
        for name in ["orders", "billing", "audit", "shipments"] {
            assert!(text.contains(&format!("destination {name} ")), "{name} missing");
        }
        assert!(text.contains("totals: destinations=4 remote_queue_points=4 streams=3"));
    }
}
