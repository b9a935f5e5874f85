use reqwest::multipart::{Form, Part};
use reqwest::Method;
use std::path::Path;
use tracing::info;

use super::models::{ImportPaperRequest, Paper};
use super::validation::{require_text, validate_pdf_name, PDF_REQUIRED};
use super::Gateway;
use crate::utils::{GatewayError, GatewayResult};

impl Gateway {
    /// 搜索外部论文索引，结果不属于任何工作区
    pub async fn search_papers(&self, query: &str) -> GatewayResult<Vec<Paper>> {
        require_text(query, "Please enter a search query")?;

        info!("搜索论文: {}", query);
        let req = self
            .authed(Method::GET, "/papers/search")?
            .query(&[("query", query)]);
        let papers: Vec<Paper> = self.send(req).await?;

        info!("找到 {} 篇论文", papers.len());
        Ok(papers)
    }

    pub async fn import_paper(&self, paper: &Paper, workspace_id: i64) -> GatewayResult<Paper> {
        let req = self
            .authed(Method::POST, "/papers/import")?
            .json(&ImportPaperRequest { paper, workspace_id });
        let stored: Paper = self.send(req).await?;

        info!("论文已导入工作区 {}: {}", workspace_id, stored.title);
        Ok(stored)
    }

    pub async fn list_papers(&self, workspace_id: i64) -> GatewayResult<Vec<Paper>> {
        let req = self.authed(Method::GET, &format!("/papers/workspace/{}", workspace_id))?;
        self.send(req).await
    }

    /// 上传 PDF，文件名必须以 `.pdf` 结尾
    pub async fn upload_paper(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        workspace_id: i64,
    ) -> GatewayResult<Paper> {
        validate_pdf_name(file_name)?;

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .part("file", part)
            .text("workspace_id", workspace_id.to_string());

        info!("上传PDF: {} -> 工作区 {}", file_name, workspace_id);
        let req = self.authed(Method::POST, "/papers/upload")?.multipart(form);
        let stored: Paper = self.send(req).await?;

        info!("PDF上传完成: {}", stored.title);
        Ok(stored)
    }

    /// 先校验扩展名再读盘
    pub async fn upload_paper_file(&self, path: &Path, workspace_id: i64) -> GatewayResult<Paper> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| GatewayError::Validation(PDF_REQUIRED.to_string()))?;
        validate_pdf_name(&file_name)?;

        let bytes = tokio::fs::read(path).await?;
        self.upload_paper(&file_name, bytes, workspace_id).await
    }
}
