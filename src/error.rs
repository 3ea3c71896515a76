// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Invalid table prefix {0:?}: only ASCII letters, digits and '_' are allowed")]
    InvalidTablePrefix(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
