use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, KeysAndAttributes, Select};
use common_macros::hash_map;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_attribute_value, to_item};
use service_core::ddb::batch_get_item::{BatchGetItem, BatchGetItemInput};
use service_core::ddb::delete_item::{DeleteItem, DeleteItemInput};
use service_core::ddb::get_item::{GetItem, GetItemInput};
use service_core::ddb::put_item::{PutItem, PutItemInput};
use service_core::ddb::query::{Query, QueryInput};
use service_core::ddb::scan::{Scan, ScanInput};
use service_core::ddb::store_error::StoreError;
use service_core::ddb::update_expression::SetUpdate;
use service_core::ddb::update_item::{UpdateItem, UpdateItemInput};
use uuid::Uuid;

use crate::catalog::repository::{
    CourseFilters, CourseUpdate, CoursesRepository, UpdateCourseError,
};
use crate::catalog::Course;
use crate::user_profile::ddb_repository::ThreadSafeDdbClient;

const TEACHER_ID_INDEX: &str = "TeacherIdIndex";
const DEFAULT_LIST_LIMIT: i32 = 100;
const BATCH_GET_CHUNK: usize = 100;
const SCAN_PAGE_SIZE: i32 = 1000;
const COUNT_PAGE_SIZE: i32 = 1000;

pub struct DdbCoursesRepository<T: ThreadSafeDdbClient> {
    ddb: T,
    courses_table_name: String,
}

impl<T: ThreadSafeDdbClient> DdbCoursesRepository<T> {
    pub fn new(ddb: T, courses_table_name: impl Into<String>) -> Self {
        DdbCoursesRepository {
            ddb,
            courses_table_name: courses_table_name.into(),
        }
    }

    fn course_key(&self, course_id: &Uuid) -> HashMap<String, AttributeValue> {
        hash_map! {
            "courseId".to_string() => AttributeValue::S(course_id.to_string()),
        }
    }
}

#[async_trait]
impl<T: ThreadSafeDdbClient> CoursesRepository for DdbCoursesRepository<T> {
    async fn create_course(&self, course: &Course) -> Result<(), StoreError> {
        let item = to_item(course).map_err(StoreError::from_source)?;
        let put_item_input = PutItemInput::builder()
            .table_name(self.courses_table_name.as_str())
            .item(item)
            .condition_expression("attribute_not_exists(courseId)")
            .build();

        self.ddb
            .put_item(put_item_input)
            .await
            .map_err(StoreError::from_source)?;
        Ok(())
    }

    async fn get_course(&self, course_id: &Uuid) -> Result<Option<Course>, StoreError> {
        let get_item_input = GetItemInput::builder()
            .table_name(self.courses_table_name.as_str())
            .key(self.course_key(course_id))
            .build();
        let output = self
            .ddb
            .get_item(get_item_input)
            .await
            .map_err(StoreError::from_source)?;

        match output.item {
            None => Ok(None),
            Some(item) => Ok(Some(from_item(item).map_err(StoreError::from_source)?)),
        }
    }

    async fn list_courses(&self, filters: &CourseFilters) -> Result<Vec<Course>, StoreError> {
        let mut filter_parts: Vec<String> = Vec::new();
        let mut names: HashMap<String, String> = HashMap::new();
        let mut values: HashMap<String, AttributeValue> = HashMap::new();

        if let Some(category) = &filters.category {
            filter_parts.push("#category = :category".to_string());
            names.insert("#category".to_string(), "category".to_string());
            values.insert(":category".to_string(), AttributeValue::S(category.clone()));
        }
        if let Some(level) = &filters.level {
            // `level` is a DynamoDB reserved word.
            filter_parts.push("#level = :level".to_string());
            names.insert("#level".to_string(), "level".to_string());
            values.insert(
                ":level".to_string(),
                to_attribute_value(level).map_err(StoreError::from_source)?,
            );
        }
        if let Some(is_published) = filters.is_published {
            filter_parts.push("#isPublished = :isPublished".to_string());
            names.insert("#isPublished".to_string(), "isPublished".to_string());
            values.insert(
                ":isPublished".to_string(),
                AttributeValue::Bool(is_published),
            );
        }

        let filter_expression = if filter_parts.is_empty() {
            None
        } else {
            Some(filter_parts.join(" AND "))
        };
        let names = if names.is_empty() { None } else { Some(names) };
        let limit = filters.limit.unwrap_or(DEFAULT_LIST_LIMIT);

        let items = match &filters.teacher_id {
            Some(teacher_id) => {
                values.insert(
                    ":teacherId".to_string(),
                    AttributeValue::S(teacher_id.to_string()),
                );
                let query_input = QueryInput::builder()
                    .table_name(self.courses_table_name.as_str())
                    .index_name(TEACHER_ID_INDEX)
                    .key_condition_expression("teacherId = :teacherId")
                    .select(Select::AllProjectedAttributes)
                    .scan_index_forward(false)
                    .limit(limit)
                    .filter_expression(filter_expression)
                    .expression_attribute_names(names)
                    .expression_attribute_values(Some(values))
                    .build();
                self.ddb
                    .query(query_input)
                    .await
                    .map_err(StoreError::from_source)?
                    .items
            }
            None => {
                let values = if values.is_empty() { None } else { Some(values) };
                let scan_input = ScanInput::builder()
                    .table_name(self.courses_table_name.as_str())
                    .limit(limit)
                    .filter_expression(filter_expression)
                    .expression_attribute_names(names)
                    .expression_attribute_values(values)
                    .build();
                self.ddb
                    .scan(scan_input)
                    .await
                    .map_err(StoreError::from_source)?
                    .items
            }
        };

        let mut courses: Vec<Course> = match items {
            None => vec![],
            Some(items) => from_items(items).map_err(StoreError::from_source)?,
        };
        // Scans come back in key order, not creation order.
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(courses)
    }

    async fn list_all(&self) -> Result<Vec<Course>, StoreError> {
        let mut courses = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let scan_input = ScanInput::builder()
                .table_name(self.courses_table_name.as_str())
                .limit(SCAN_PAGE_SIZE)
                .exclusive_start_key(start_key.take())
                .build();
            let output = self
                .ddb
                .scan(scan_input)
                .await
                .map_err(StoreError::from_source)?;
            if let Some(items) = output.items {
                let mut page: Vec<Course> = from_items(items).map_err(StoreError::from_source)?;
                courses.append(&mut page);
            }
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }
        Ok(courses)
    }

    async fn update_course(
        &self,
        course_id: &Uuid,
        update: &CourseUpdate,
    ) -> Result<(), UpdateCourseError> {
        let mut set = SetUpdate::new();
        if let Some(title) = &update.title {
            set.set("title", AttributeValue::S(title.clone()));
        }
        if let Some(description) = &update.description {
            set.set("description", AttributeValue::S(description.clone()));
        }
        if let Some(thumbnail) = &update.thumbnail {
            set.set("thumbnail", AttributeValue::S(thumbnail.clone()));
        }
        if let Some(category) = &update.category {
            set.set("category", AttributeValue::S(category.clone()));
        }
        if let Some(level) = &update.level {
            set.set(
                "level",
                to_attribute_value(level).map_err(StoreError::from_source)?,
            );
        }
        if let Some(duration) = &update.duration {
            set.set("duration", AttributeValue::S(duration.clone()));
        }
        if let Some(price) = update.price {
            set.set("price", AttributeValue::N(price.to_string()));
        }
        if let Some(is_published) = update.is_published {
            set.set("isPublished", AttributeValue::Bool(is_published));
        }
        set.set(
            "updatedAt",
            to_attribute_value(chrono::Utc::now()).map_err(StoreError::from_source)?,
        );

        let pk = set.alias("courseId");
        let condition_expression = format!("attribute_exists({pk})");
        let (update_expression, names, values) = set.into_parts();
        let update_item_input = UpdateItemInput::builder()
            .table_name(self.courses_table_name.as_str())
            .key(self.course_key(course_id))
            .update_expression(update_expression)
            .condition_expression(condition_expression)
            .expression_attribute_names(names)
            .expression_attribute_values(values)
            .build();

        self.ddb
            .update_item(update_item_input)
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    UpdateCourseError::NotFound
                } else {
                    UpdateCourseError::Store(StoreError::from_source(service_err))
                }
            })?;
        Ok(())
    }

    async fn delete_course(&self, course_id: &Uuid) -> Result<(), StoreError> {
        let delete_item_input = DeleteItemInput::builder()
            .table_name(self.courses_table_name.as_str())
            .key(self.course_key(course_id))
            .build();

        self.ddb
            .delete_item(delete_item_input)
            .await
            .map_err(StoreError::from_source)?;
        Ok(())
    }

    async fn increment_students_enrolled(
        &self,
        course_id: &Uuid,
        delta: i64,
    ) -> Result<(), UpdateCourseError> {
        let update_item_input = UpdateItemInput::builder()
            .table_name(self.courses_table_name.as_str())
            .key(self.course_key(course_id))
            .update_expression("ADD studentsEnrolled :delta")
            .condition_expression("attribute_exists(courseId)")
            .expression_attribute_values(hash_map! {
                ":delta".to_string() => AttributeValue::N(delta.to_string()),
            })
            .build();

        self.ddb
            .update_item(update_item_input)
            .await
            .map_err(|err| {
                let service_err = err.into_service_error();
                if service_err.is_conditional_check_failed_exception() {
                    UpdateCourseError::NotFound
                } else {
                    UpdateCourseError::Store(StoreError::from_source(service_err))
                }
            })?;
        Ok(())
    }

    async fn batch_get_courses(
        &self,
        course_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Course>, StoreError> {
        let mut courses = HashMap::with_capacity(course_ids.len());
        for chunk in course_ids.chunks(BATCH_GET_CHUNK) {
            let keys: Vec<HashMap<String, AttributeValue>> =
                chunk.iter().map(|id| self.course_key(id)).collect();
            let keys_and_attributes = KeysAndAttributes::builder()
                .set_keys(Some(keys))
                .build()
                .map_err(StoreError::from_source)?;
            let batch_get_input = BatchGetItemInput::builder()
                .request_items(hash_map! {
                    self.courses_table_name.clone() => keys_and_attributes,
                })
                .build();
            let output = self
                .ddb
                .batch_get_item(batch_get_input)
                .await
                .map_err(StoreError::from_source)?;

            if let Some(unprocessed) = &output.unprocessed_keys {
                if !unprocessed.is_empty() {
                    log::warn!(
                        "BatchGetItem left {} table(s) with unprocessed keys.",
                        unprocessed.len()
                    );
                }
            }

            let Some(mut responses) = output.responses else {
                continue;
            };
            let Some(items) = responses.remove(&self.courses_table_name) else {
                continue;
            };
            for item in items {
                let course: Course = from_item(item).map_err(StoreError::from_source)?;
                courses.insert(course.course_id, course);
            }
        }
        Ok(courses)
    }

    async fn count_courses(&self) -> Result<i64, StoreError> {
        let mut total: i64 = 0;
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let scan_input = ScanInput::builder()
                .table_name(self.courses_table_name.as_str())
                .select(Select::Count)
                .limit(COUNT_PAGE_SIZE)
                .exclusive_start_key(start_key.take())
                .build();
            let output = self
                .ddb
                .scan(scan_input)
                .await
                .map_err(StoreError::from_source)?;
            total += output.count as i64;
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }
        Ok(total)
    }
}
