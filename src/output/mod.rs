// SPDX-License-Identifier: GPL-3.0-only

//! Output actions for the composited artifact: local save, system share,
//! and the best-effort gallery upload

pub mod download;
pub mod share;
pub mod upload;
