//! Turns a tracked colored light source, seen through a camera aimed at a
//! projected display, into a virtual pointer on that display.
//!
//! The pipeline: a [`source::PointSource`] yields detected camera-space
//! points; [`collector`] pairs four of them with the display anchors;
//! [`homography`] solves the projective transform; per frame,
//! [`mapper`] maps detections into display space and [`gate`] decides
//! which mapped points become pointer events on an [`events::PointerSink`].

pub mod collector;
pub mod detection;
pub mod events;
pub mod gate;
pub mod homography;
pub mod io;
pub mod mapper;
pub mod session;
pub mod source;
pub mod types;
