// src/models/page.rs

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 200;

// Parâmetros de paginação no estilo ?page=0&size=20&search=...
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub search: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn limit(&self) -> i64 {
        self.size() as i64
    }

    pub fn offset(&self) -> i64 {
        (self.page() * self.size()) as i64
    }

    /// Termo de busca normalizado; None quando em branco.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// Página de resultados no formato que o frontend já consome.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_elements: i64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, params: &PageParams, total_elements: i64) -> Self {
        let size = params.size();
        let total_pages = (total_elements.max(0) as u64).div_ceil(size);

        Self {
            content,
            page: params.page(),
            size,
            total_elements,
            total_pages,
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tamanho_padrao_e_offset() {
        let params = PageParams {
            page: Some(2),
            size: None,
            search: None,
        };
        assert_eq!(params.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.offset(), 40);
    }

    #[test]
    fn busca_em_branco_vira_none() {
        let params = PageParams {
            page: None,
            size: None,
            search: Some("   ".to_string()),
        };
        assert_eq!(params.search_term(), None);
    }

    #[test]
    fn total_de_paginas_arredonda_para_cima() {
        let params = PageParams {
            page: Some(0),
            size: Some(10),
            search: None,
        };
        let page: Page<i32> = Page::new(vec![], &params, 25);
        assert_eq!(page.total_pages, 3);
    }
}
