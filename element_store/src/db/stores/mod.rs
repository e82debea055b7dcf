// SPDX-License-Identifier: AGPL-3.0-or-later

//! Methods of [`SqlStore`](crate::db::SqlStore) grouped by the table they mainly work on.
mod country;
mod date;
mod element;
mod gender;
mod image;
mod loaders;
mod number;
mod order;
mod qr_code;
mod reference;
mod template;
mod text;
mod text_props;
mod validation;
mod variant;
