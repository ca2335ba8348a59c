use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use chrono::Utc;
use common_macros::hash_map;
use serde_dynamo::aws_sdk_dynamodb_1::{from_item, from_items, to_attribute_value, to_item};
use service_core::ddb::put_item::{PutItem, PutItemInput};
use service_core::ddb::query::{Query, QueryInput};
use service_core::ddb::scan::{Scan, ScanInput};
use service_core::ddb::store_error::StoreError;
use service_core::ddb::update_expression::SetUpdate;
use service_core::ddb::update_item::{UpdateItem, UpdateItemInput};
use uuid::Uuid;

use crate::enrollment::repository::{
    CreateEnrollmentError, EnrollmentsRepository, ProgressUpdate, UpdateEnrollmentError,
};
use crate::enrollment::Enrollment;
use crate::user_profile::ddb_repository::ThreadSafeDdbClient;

const STUDENT_ID_INDEX: &str = "StudentIdIndex";
const ENROLLMENT_ID_INDEX: &str = "EnrollmentIdIndex";
const STUDENT_QUERY_LIMIT: i32 = 200;
const SCAN_PAGE_SIZE: i32 = 1000;

pub struct DdbEnrollmentsRepository<T: ThreadSafeDdbClient> {
    ddb: T,
    enrollments_table_name: String,
}

impl<T: ThreadSafeDdbClient> DdbEnrollmentsRepository<T> {
    pub fn new(ddb: T, enrollments_table_name: impl Into<String>) -> Self {
        DdbEnrollmentsRepository {
            ddb,
            enrollments_table_name: enrollments_table_name.into(),
        }
    }

    fn enrollment_key(
        &self,
        course_id: &Uuid,
        student_id: &Uuid,
    ) -> HashMap<String, AttributeValue> {
        hash_map! {
            "courseId".to_string() => AttributeValue::S(course_id.to_string()),
            "studentId".to_string() => AttributeValue::S(student_id.to_string()),
        }
    }
}

#[async_trait]
impl<T: ThreadSafeDdbClient> EnrollmentsRepository for DdbEnrollmentsRepository<T> {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), CreateEnrollmentError> {
        let item = to_item(enrollment).map_err(StoreError::from_source)?;
        let put_item_input = PutItemInput::builder()
            .table_name(self.enrollments_table_name.as_str())
            .item(item)
            .condition_expression(
                "attribute_not_exists(courseId) AND attribute_not_exists(studentId)",
            )
            .build();

        self.ddb.put_item(put_item_input).await.map_err(|err| {
            let service_err = err.into_service_error();
            if service_err.is_conditional_check_failed_exception() {
                CreateEnrollmentError::AlreadyEnrolled
            } else {
                CreateEnrollmentError::Store(StoreError::from_source(service_err))
            }
        })?;
        Ok(())
    }

    async fn get_enrollment(&self, enrollment_id: &Uuid) -> Result<Option<Enrollment>, StoreError> {
        let query_input = QueryInput::builder()
            .table_name(self.enrollments_table_name.as_str())
            .index_name(ENROLLMENT_ID_INDEX)
            .key_condition_expression("enrollmentId = :enrollmentId")
            .select(Select::AllProjectedAttributes)
            .expression_attribute_values(Some(hash_map! {
                ":enrollmentId".to_string() => AttributeValue::S(enrollment_id.to_string()),
            }))
            .limit(1)
            .build();
        let output = self
            .ddb
            .query(query_input)
            .await
            .map_err(StoreError::from_source)?;

        match output.items.and_then(|mut items| items.pop()) {
            None => Ok(None),
            Some(item) => Ok(Some(from_item(item).map_err(StoreError::from_source)?)),
        }
    }

    async fn list_for_student(&self, student_id: &Uuid) -> Result<Vec<Enrollment>, StoreError> {
        let query_input = QueryInput::builder()
            .table_name(self.enrollments_table_name.as_str())
            .index_name(STUDENT_ID_INDEX)
            .key_condition_expression("studentId = :studentId")
            .select(Select::AllProjectedAttributes)
            .expression_attribute_values(Some(hash_map! {
                ":studentId".to_string() => AttributeValue::S(student_id.to_string()),
            }))
            .limit(STUDENT_QUERY_LIMIT)
            .build();
        let output = self
            .ddb
            .query(query_input)
            .await
            .map_err(StoreError::from_source)?;

        match output.items {
            None => Ok(vec![]),
            Some(items) => Ok(from_items(items).map_err(StoreError::from_source)?),
        }
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError> {
        let mut enrollments = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;
        loop {
            let scan_input = ScanInput::builder()
                .table_name(self.enrollments_table_name.as_str())
                .limit(SCAN_PAGE_SIZE)
                .exclusive_start_key(start_key.take())
                .build();
            let output = self
                .ddb
                .scan(scan_input)
                .await
                .map_err(StoreError::from_source)?;
            if let Some(items) = output.items {
                let mut page: Vec<Enrollment> =
                    from_items(items).map_err(StoreError::from_source)?;
                enrollments.append(&mut page);
            }
            match output.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }
        Ok(enrollments)
    }

    async fn update_progress(
        &self,
        enrollment_id: &Uuid,
        update: &ProgressUpdate,
    ) -> Result<(), UpdateEnrollmentError> {
        // The index only carries the enrollment id; the table key is the
        // course/student pair, so resolve that first.
        let enrollment = self
            .get_enrollment(enrollment_id)
            .await?
            .ok_or(UpdateEnrollmentError::NotFound)?;

        let mut set = SetUpdate::new();
        set.set("progress", AttributeValue::N(update.progress.to_string()));
        set.set(
            "completedLessons",
            to_attribute_value(&update.completed_lessons).map_err(StoreError::from_source)?,
        );
        set.set(
            "lastAccessed",
            to_attribute_value(Utc::now()).map_err(StoreError::from_source)?,
        );

        let pk = set.alias("courseId");
        let condition_expression = format!("attribute_exists({pk})");
        let (update_expression, names, values) = set.into_parts();
        let update_item_input = UpdateItemInput::builder()
            .table_name(self.enrollments_table_name.as_str())
            .key(self.enrollment_key(&enrollment.course_id, &enrollment.student_id))
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
                    UpdateEnrollmentError::NotFound
                } else {
                    UpdateEnrollmentError::Store(StoreError::from_source(service_err))
                }
            })?;
        Ok(())
    }
}
