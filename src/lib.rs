//! # fls-core
//!
//! Fuzzy logic control graphs: input variables, inference nodes, one output variable.
//!
//! ---
//!
//! ## The graph is made of ids
//!
//! A control graph is user-edited. Nodes reference membership sets and each other
//! in whatever direction the author wires them, and the whole thing has to survive
//! being saved, loaded and duplicated. So nothing points at anything: the
//! [`FuzzyLogic`] container owns every entity by value, and every link is an
//! opaque [`Id`] resolved through the container's index.
//!
//! **Fuzzifications** are input axes. Each holds trapezoidal membership sets and a
//! crisp baseline value.
//!
//! **Inference nodes** combine one or two degrees with `And` (min), `Or` (max),
//! `Not` (1 − x) or `Passthrough`. An input is either a fuzzification set (its
//! degree at the current baseline) or another node (its result, recursively).
//!
//! **The defuzzification** is the output axis. Every update pass writes node
//! results into the heights of its sets; turning those heights into one crisp
//! output is left to the consumer.
//!
//! ---
//!
//! ## The pipeline
//!
//! ```text
//! baseline values → Fuzzification sets → InferenceNode graph → Defuzzification heights
//!                          ↑                     ↑                      ↑
//!                 MembershipGeometry      has_cycle / link_input    run_update
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`id`] | [`Id`] | Opaque, globally unique identifiers |
//! | [`error`] | [`FuzzyError`] | Structural vs. data errors |
//! | [`membership`] | [`MembershipSet`], [`MembershipGeometry`] | Trapezoid sets and the degree query seam |
//! | [`variable`] | [`Fuzzification`], [`Defuzzification`] | Ordered set collections with a baseline |
//! | [`ops`] | [`Operator`] | And / Or / Not / Passthrough |
//! | [`inference`] | [`InferenceNode`] | Rule units linked by id |
//! | [`model`] | [`FuzzyLogic`], [`Reference`] | Container, registry, id classification |
//! | [`evaluate`] | [`Evaluator`] | Recursive evaluation and cycle detection |
//! | [`update`] | [`UpdateConfig`], [`UpdateReport`] | The per-tick update pass |
//! | [`link`] | [`Candidate`] | Cycle-checked linking and editor choices |
//!
//! ## Example
//!
//! ```rust
//! use fls_core::{FuzzyLogic, InputSide, Operator, TrapezoidShape};
//!
//! let mut logic = FuzzyLogic::new();
//! logic.initialize();
//!
//! let temperature = logic.fuzzification(0)?.id().clone();
//! let warm = logic.add_membership_set(&temperature)?;
//! logic.membership_set_mut(&warm)?.shape = TrapezoidShape::new(15.0, 20.0, 25.0, 30.0);
//!
//! let fan = logic.defuzzification()?.id().clone();
//! let fast = logic.add_membership_set(&fan)?;
//!
//! let rule = logic.add_inference()?;
//! logic.set_operator(&rule, Operator::Passthrough)?;
//! logic.link_input(&rule, InputSide::Left, &warm)?;
//! logic.set_output(&rule, Some(fast.clone()))?;
//!
//! logic.set_input_value(&temperature, 27.5)?;
//! logic.set_evaluation_enabled(true);
//! logic.run_update()?;
//! assert_eq!(logic.height(&fast)?, 0.5);
//! # Ok::<(), fls_core::FuzzyError>(())
//! ```
//!
//! ## `no_std`
//!
//! This crate is `#![no_std]` by default and needs `alloc`. Enable the `std` feature
//! to route `tracing` and `uuid` through the standard library. Enable the `serde`
//! feature to persist a model; only the forward collections are stored, so a
//! loaded model must be initialized again before use.
//!
//! ## License
//!
//! Business Source License 1.1.

#![cfg_attr(not(any(feature = "std", feature = "python-ffi")), no_std)]
#![cfg_attr(not(feature = "python-ffi"), deny(unsafe_code))]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

pub mod error;
pub mod evaluate;
pub mod id;
pub mod inference;
pub mod link;
pub mod membership;
pub mod model;
pub mod ops;
pub mod update;
pub mod variable;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use error::{FuzzyError, FuzzyResult};
pub use evaluate::Evaluator;
pub use id::Id;
pub use inference::{InferenceNode, InputSide};
pub use link::Candidate;
pub use membership::{MembershipGeometry, MembershipSet, TrapezoidGeometry, TrapezoidShape};
pub use model::{FuzzyLogic, Reference};
pub use ops::Operator;
pub use update::{UpdateConfig, UpdateReport};
pub use variable::{Defuzzification, Fuzzification, Variable};
