//! SQL statement execution, warehouses and DBFS listing.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::sql::*;

impl WorkspaceClient {
    /// Submit a statement to the statement-execution API and wait for it
    /// inline. Caller-supplied values travel in `request.parameters`, never
    /// in the statement text.
    pub async fn execute_statement(&self, request: &StatementRequest) -> Result<StatementResponse> {
        self.post("/api/2.0/sql/statements", request).await
    }

    pub async fn list_warehouses(&self) -> Result<WarehouseList> {
        self.get("/api/2.0/sql/warehouses").await
    }

    pub async fn list_dbfs(&self, path: &str) -> Result<DbfsList> {
        self.get_query("/api/2.0/dbfs/list", &[("path", path.into())])
            .await
    }
}
