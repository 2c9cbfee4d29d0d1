use super::dedupe_boxes;
use crate::domain::model::PackagingBox;
use crate::domain::ports::BoxCatalog;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Catalog backed by a fixed list, typically from configuration.
#[derive(Debug, Clone)]
pub struct StaticBoxCatalog {
    boxes: Vec<PackagingBox>,
}

impl StaticBoxCatalog {
    pub fn new(boxes: Vec<PackagingBox>) -> Self {
        Self {
            boxes: dedupe_boxes(boxes),
        }
    }

    pub fn default_boxes() -> Vec<PackagingBox> {
        vec![
            PackagingBox::new(1, 10.0, 10.0, 10.0, 20.0),
            PackagingBox::new(2, 10.0, 10.0, 10.0, 50.0),
            PackagingBox::new(3, 20.0, 20.0, 20.0, 100.0),
            PackagingBox::new(4, 50.0, 50.0, 50.0, 200.0),
        ]
    }
}

impl Default for StaticBoxCatalog {
    fn default() -> Self {
        Self::new(Self::default_boxes())
    }
}

#[async_trait]
impl BoxCatalog for StaticBoxCatalog {
    async fn list_boxes(&self) -> Result<Vec<PackagingBox>> {
        Ok(self.boxes.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<PackagingBox>> {
        Ok(self.boxes.iter().find(|b| b.id == id).cloned())
    }
}
