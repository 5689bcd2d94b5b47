//! Property tests for the encoder link state machine
//!
//! Random call sequences, including failures injected at the upstream, must
//! keep the node, its back-links and the power-down pin consistent with a
//! simple reference model.

#![cfg(feature = "mock-hardware")]

mod common;

use common::mock_helpers::{connector, Rig, DPI_ID, ENCODER_ID};
use encoder_link::hal::PinLevel;
use encoder_link::{EncoderNode, LinkState, Tfp410, VideoTiming};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Connect,
    Disconnect,
    Enable,
    Disable,
    SetTimings(u32),
    FailConnect(bool),
    FailEnable(bool),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::Connect),
        3 => Just(Op::Disconnect),
        3 => Just(Op::Enable),
        3 => Just(Op::Disable),
        1 => (25_000u32..200_000).prop_map(Op::SetTimings),
        1 => any::<bool>().prop_map(Op::FailConnect),
        1 => any::<bool>().prop_map(Op::FailEnable),
    ]
}

/// What a correct node should do with each call
#[derive(Debug, Default)]
struct Model {
    state: LinkState,
    fail_connect: bool,
    fail_enable: bool,
}

impl Model {
    fn apply(&mut self, op: &Op) -> Option<bool> {
        match op {
            Op::Connect => {
                let ok = self.state == LinkState::Disconnected && !self.fail_connect;
                if ok {
                    self.state = LinkState::Connected;
                }
                Some(ok)
            }
            Op::Disconnect => {
                let ok = self.state == LinkState::Connected;
                if ok {
                    self.state = LinkState::Disconnected;
                }
                Some(ok)
            }
            Op::Enable => {
                let ok = match self.state {
                    LinkState::Enabled => true,
                    LinkState::Disconnected => false,
                    LinkState::Connected => !self.fail_enable,
                };
                if ok {
                    self.state = LinkState::Enabled;
                }
                Some(ok)
            }
            Op::Disable => {
                if self.state == LinkState::Enabled {
                    self.state = LinkState::Connected;
                }
                None
            }
            Op::SetTimings(_) => None,
            Op::FailConnect(fail) => {
                self.fail_connect = *fail;
                None
            }
            Op::FailEnable(fail) => {
                self.fail_enable = *fail;
                None
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_node_tracks_reference_model(ops in prop::collection::vec(op_strategy(), 1..64)) {
        let rig = Rig::new();
        let chip = Tfp410::new(Some(Box::new(rig.pin.clone()))).with_data_lines(18);
        let mut node = EncoderNode::tfp410(ENCODER_ID, "tfp410.0", rig.dpi.clone(), chip, None)
            .unwrap();
        let conn = connector(encoder_link::DeviceId(3));
        let mut model = Model::default();

        for op in &ops {
            let outcome = match op {
                Op::Connect => Some(node.connect(&conn).is_ok()),
                Op::Disconnect => Some(node.disconnect(&conn).is_ok()),
                Op::Enable => Some(node.enable().is_ok()),
                Op::Disable => {
                    node.disable();
                    None
                }
                Op::SetTimings(khz) => {
                    let mut t = VideoTiming::xga60();
                    t.pixel_clock_khz = *khz;
                    node.set_timings(&t);
                    None
                }
                Op::FailConnect(fail) => {
                    rig.faults.fail_connect(*fail);
                    None
                }
                Op::FailEnable(fail) => {
                    rig.faults.fail_enable(*fail);
                    None
                }
            };

            let expected = model.apply(op);
            prop_assert_eq!(outcome, expected, "outcome of {:?}", op);
            prop_assert_eq!(node.state(), model.state, "state after {:?}", op);

            let connected = model.state.is_connected();
            prop_assert_eq!(conn.source(), connected.then_some(ENCODER_ID));
            prop_assert_eq!(node.source(), connected.then_some(DPI_ID));
            prop_assert_eq!(node.downstream().is_some(), connected);

            let expected_pin = if model.state == LinkState::Enabled {
                PinLevel::High
            } else {
                PinLevel::Low
            };
            prop_assert_eq!(rig.pin.level(), Some(expected_pin));
        }
    }

    #[test]
    fn prop_stored_timings_are_normalized(khz in 1u32..400_000, x in 1u16..4096, y in 1u16..4096) {
        let rig = Rig::new();
        let mut node =
            EncoderNode::tfp410(ENCODER_ID, "tfp410.0", rig.dpi.clone(), Tfp410::new(None), None)
                .unwrap();

        let mut t = VideoTiming::new(x, y, khz);
        t.data_pclk_edge = encoder_link::SignalEdge::Falling;
        t.de_level = encoder_link::SignalLevel::ActiveLow;
        node.set_timings(&t);

        let stored = node.get_timings();
        prop_assert_eq!(stored.x_res, x);
        prop_assert_eq!(stored.y_res, y);
        prop_assert_eq!(stored.pixel_clock_khz, khz);
        prop_assert_eq!(stored.data_pclk_edge, encoder_link::SignalEdge::Rising);
        prop_assert_eq!(stored.sync_pclk_edge, encoder_link::SignalEdge::Rising);
        prop_assert_eq!(stored.de_level, encoder_link::SignalLevel::ActiveHigh);
    }
}
