//! Server side of the drag-and-drop reorder view.
//!
//! The admin list posts the ids of its rows, in their new order, as repeated `neworder[]` form
//! fields. Everything about serving HTTP is left to the caller: this module only checks the
//! permission, decodes the body and hands the ids to [`ReorderEngine::set_orders`].

use std::{fmt, str::FromStr};

use http::{Method, Response, StatusCode};
use sea_orm::TransactionTrait;
use thiserror::Error;
use tracing::{debug, error};
use url::form_urlencoded;

use crate::{Error, Group, Orderable, Position, ReorderEngine};

pub const NEW_ORDER_FIELD: &str = "neworder[]";

/// Decides whether the requester may change rows of a table.
pub trait ReorderPermission {
	fn has_change_permission(&self, table: &str) -> bool;
}

#[derive(Debug, Error)]
pub enum AdminError {
	#[error("not allowed to reorder '{0}'")]
	PermissionDenied(String),
	#[error("invalid id in reorder request: '{0}'")]
	InvalidId(String),
	#[error(transparent)]
	Reorder(#[from] Error),
}

impl AdminError {
	#[must_use]
	pub const fn status_code(&self) -> StatusCode {
		match self {
			Self::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Self::InvalidId(_) => StatusCode::BAD_REQUEST,
			Self::Reorder(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

/// Collects every `neworder[]` value of an urlencoded body, in order.
pub fn parse_new_order<Id: FromStr>(body: &str) -> Result<Vec<Id>, AdminError> {
	form_urlencoded::parse(body.as_bytes())
		.filter(|(key, _)| *key == NEW_ORDER_FIELD)
		.map(|(_, value)| {
			value
				.parse()
				.map_err(|_| AdminError::InvalidId(value.into_owned()))
		})
		.collect()
}

/// Drag handle label rendered next to each row of the list.
pub fn sort_handle(id: impl fmt::Display, order: Position) -> String {
	format!(r#"<span id="neworder-{id}" class="sorthandle">{order}</span>"#)
}

/// Reorder view bound to the whole table of `E`.
#[derive(Debug, Clone)]
pub struct ReorderView<E> {
	engine: ReorderEngine<E>,
	site_name: String,
	app_label: String,
}

impl<E> ReorderView<E>
where
	E: Orderable,
	E::Id: FromStr,
{
	pub fn new(
		engine: ReorderEngine<E>,
		site_name: impl Into<String>,
		app_label: impl Into<String>,
	) -> Self {
		Self {
			engine,
			site_name: site_name.into(),
			app_label: app_label.into(),
		}
	}

	/// Name the view is routed under, e.g. `adminadmin_tests_tasks_reorder`.
	#[must_use]
	pub fn url_name(&self) -> String {
		format!(
			"{}admin_{}_{}_reorder",
			self.site_name,
			self.app_label,
			E::default().table_name()
		)
	}

	/// Checks the permission and, for a `POST` with at least one id, applies the new order.
	pub async fn reorder(
		&self,
		db: &impl TransactionTrait,
		requester: &impl ReorderPermission,
		method: &Method,
		body: &str,
	) -> Result<Vec<(E::Id, Position)>, AdminError> {
		let table = E::default().table_name().to_string();
		if !requester.has_change_permission(&table) {
			return Err(AdminError::PermissionDenied(table));
		}

		if *method != Method::POST {
			return Ok(vec![]);
		}

		let ids = parse_new_order::<E::Id>(body)?;
		if ids.is_empty() {
			return Ok(vec![]);
		}

		debug!(%table, count = ids.len(), "reordering from admin");

		Ok(self.engine.set_orders(db, &Group::whole(), &ids).await?)
	}

	/// Same as [`Self::reorder`], answered as a plain text response.
	pub async fn respond(
		&self,
		db: &impl TransactionTrait,
		requester: &impl ReorderPermission,
		method: &Method,
		body: &str,
	) -> Response<String> {
		let (status, body) = match self.reorder(db, requester, method, body).await {
			Ok(_) => (StatusCode::OK, "OK".to_string()),
			Err(e) => {
				error!(%e, "reorder request failed");
				(e.status_code(), e.to_string())
			}
		};

		let mut response = Response::new(body);
		*response.status_mut() = status;
		response
	}
}
