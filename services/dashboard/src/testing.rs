use std::collections::{HashMap, VecDeque};
use std::ops::Deref;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::batch_get_item::{BatchGetItemError, BatchGetItemOutput};
use aws_sdk_dynamodb::operation::delete_item::{DeleteItemError, DeleteItemOutput};
use aws_sdk_dynamodb::operation::get_item::{GetItemError, GetItemOutput};
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::operation::query::{QueryError, QueryOutput};
use aws_sdk_dynamodb::operation::scan::{ScanError, ScanOutput};
use aws_sdk_dynamodb::operation::update_item::{UpdateItemError, UpdateItemOutput};
use chrono::{DateTime, Utc};
use service_core::ddb::batch_get_item::{BatchGetItem, BatchGetItemInput};
use service_core::ddb::delete_item::{DeleteItem, DeleteItemInput};
use service_core::ddb::get_item::{GetItem, GetItemInput};
use service_core::ddb::put_item::{PutItem, PutItemInput};
use service_core::ddb::query::{Query, QueryInput};
use service_core::ddb::scan::{Scan, ScanInput};
use service_core::ddb::store_error::StoreError;
use service_core::ddb::update_item::{UpdateItem, UpdateItemInput};
use uuid::Uuid;

use crate::catalog::repository::{
    CourseFilters, CourseUpdate, CoursesRepository, UpdateCourseError,
};
use crate::catalog::Course;
use crate::enrollment::repository::{
    CreateEnrollmentError, EnrollmentsRepository, ProgressUpdate, UpdateEnrollmentError,
};
use crate::enrollment::Enrollment;
use crate::identity::{AuthError, IdentityProvider, ProviderIdentity, SessionStore};
use crate::user_profile::{
    ProfileListing, ProfilePage, ProfileUpdate, ProfilesRepository, UpdateProfileError,
    UserProfile,
};

/// DynamoDB stand-in that records every request and replays canned outputs.
///
/// `update_item` additionally applies `ADD <attr> :delta` expressions to the
/// shared `counters` map so counter arithmetic can be exercised from
/// concurrent tasks. Cloning yields a handle onto the same recorded state.
#[derive(Clone, Default)]
pub(crate) struct RecordingDdb {
    state: Arc<RecordingState>,
}

#[derive(Default)]
pub(crate) struct RecordingState {
    pub put_inputs: Mutex<Vec<PutItemInput>>,
    pub get_inputs: Mutex<Vec<GetItemInput>>,
    pub update_inputs: Mutex<Vec<UpdateItemInput>>,
    pub delete_inputs: Mutex<Vec<DeleteItemInput>>,
    pub query_inputs: Mutex<Vec<QueryInput>>,
    pub scan_inputs: Mutex<Vec<ScanInput>>,
    pub batch_inputs: Mutex<Vec<BatchGetItemInput>>,

    pub canned_get: Mutex<VecDeque<GetItemOutput>>,
    pub canned_query: Mutex<VecDeque<QueryOutput>>,
    pub canned_scan: Mutex<VecDeque<ScanOutput>>,
    pub canned_batch: Mutex<VecDeque<BatchGetItemOutput>>,

    pub counters: Mutex<HashMap<String, i64>>,
}

impl Deref for RecordingDdb {
    type Target = RecordingState;

    fn deref(&self) -> &RecordingState {
        &self.state
    }
}

#[async_trait]
impl PutItem for RecordingDdb {
    async fn put_item(&self, input: PutItemInput) -> Result<PutItemOutput, SdkError<PutItemError>> {
        self.put_inputs.lock().unwrap().push(input);
        Ok(PutItemOutput::builder().build())
    }
}

#[async_trait]
impl GetItem for RecordingDdb {
    async fn get_item(&self, input: GetItemInput) -> Result<GetItemOutput, SdkError<GetItemError>> {
        self.get_inputs.lock().unwrap().push(input);
        let canned = self.canned_get.lock().unwrap().pop_front();
        Ok(canned.unwrap_or_else(|| GetItemOutput::builder().build()))
    }
}

#[async_trait]
impl UpdateItem for RecordingDdb {
    async fn update_item(
        &self,
        input: UpdateItemInput,
    ) -> Result<UpdateItemOutput, SdkError<UpdateItemError>> {
        if let Some(rest) = input.update_expression.strip_prefix("ADD ") {
            if let Some((attribute, value_ref)) = rest.split_once(' ') {
                let delta = input
                    .expression_attribute_values
                    .as_ref()
                    .and_then(|values| values.get(value_ref.trim()))
                    .and_then(|attr| attr.as_n().ok())
                    .and_then(|n| n.parse::<i64>().ok())
                    .unwrap_or(0);
                *self
                    .counters
                    .lock()
                    .unwrap()
                    .entry(attribute.to_string())
                    .or_insert(0) += delta;
            }
        }
        self.update_inputs.lock().unwrap().push(input);
        Ok(UpdateItemOutput::builder().build())
    }
}

#[async_trait]
impl DeleteItem for RecordingDdb {
    async fn delete_item(
        &self,
        input: DeleteItemInput,
    ) -> Result<DeleteItemOutput, SdkError<DeleteItemError>> {
        self.delete_inputs.lock().unwrap().push(input);
        Ok(DeleteItemOutput::builder().build())
    }
}

#[async_trait]
impl Query for RecordingDdb {
    async fn query(&self, input: QueryInput) -> Result<QueryOutput, SdkError<QueryError>> {
        self.query_inputs.lock().unwrap().push(input);
        let canned = self.canned_query.lock().unwrap().pop_front();
        Ok(canned.unwrap_or_else(|| QueryOutput::builder().build()))
    }
}

#[async_trait]
impl Scan for RecordingDdb {
    async fn scan(&self, input: ScanInput) -> Result<ScanOutput, SdkError<ScanError>> {
        self.scan_inputs.lock().unwrap().push(input);
        let canned = self.canned_scan.lock().unwrap().pop_front();
        Ok(canned.unwrap_or_else(|| ScanOutput::builder().build()))
    }
}

#[async_trait]
impl BatchGetItem for RecordingDdb {
    async fn batch_get_item(
        &self,
        input: BatchGetItemInput,
    ) -> Result<BatchGetItemOutput, SdkError<BatchGetItemError>> {
        self.batch_inputs.lock().unwrap().push(input);
        let canned = self.canned_batch.lock().unwrap().pop_front();
        Ok(canned.unwrap_or_else(|| BatchGetItemOutput::builder().build()))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryProfiles {
    pub profiles: Mutex<HashMap<Uuid, UserProfile>>,
}

impl InMemoryProfiles {
    pub fn with(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        InMemoryProfiles {
            profiles: Mutex::new(
                profiles
                    .into_iter()
                    .map(|profile| (profile.user_id, profile))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ProfilesRepository for InMemoryProfiles {
    async fn create_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.lock().unwrap();
        if profiles.contains_key(&profile.user_id) {
            return Err(StoreError::new("profile already exists"));
        }
        profiles.insert(profile.user_id, profile.clone());
        Ok(())
    }

    async fn get_profile(&self, user_id: &Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn update_profile(
        &self,
        user_id: &Uuid,
        update: &ProfileUpdate,
    ) -> Result<(), UpdateProfileError> {
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .get_mut(user_id)
            .ok_or(UpdateProfileError::NotFound)?;
        if let Some(name) = &update.name {
            profile.name = name.clone();
        }
        if let Some(avatar) = &update.avatar {
            profile.avatar = Some(avatar.clone());
        }
        if let Some(bio) = &update.bio {
            profile.bio = Some(bio.clone());
        }
        profile.last_active = Utc::now();
        Ok(())
    }

    async fn list_profiles(&self, page: &ProfilePage) -> Result<ProfileListing, StoreError> {
        let profiles = self.profiles.lock().unwrap();
        let mut all: Vec<UserProfile> = profiles.values().cloned().collect();
        all.sort_by_key(|profile| profile.user_id);
        let total = all.len();
        let start = match page.start_after {
            None => 0,
            Some(after) => all
                .iter()
                .position(|profile| profile.user_id == after)
                .map(|idx| idx + 1)
                .unwrap_or(0),
        };
        let page_items: Vec<UserProfile> = all
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();
        let next = if start + page_items.len() < total {
            page_items.last().map(|profile| profile.user_id)
        } else {
            None
        };
        Ok(ProfileListing {
            profiles: page_items,
            next,
        })
    }

    async fn count_profiles(&self) -> Result<i64, StoreError> {
        Ok(self.profiles.lock().unwrap().len() as i64)
    }

    async fn count_active_profiles(&self, since: DateTime<Utc>) -> Result<i64, StoreError> {
        Ok(self
            .profiles
            .lock()
            .unwrap()
            .values()
            .filter(|profile| profile.last_active >= since)
            .count() as i64)
    }
}

/// Profiles repository whose every call fails, for exercising store outages.
pub(crate) struct FailingProfiles;

#[async_trait]
impl ProfilesRepository for FailingProfiles {
    async fn create_profile(&self, _profile: &UserProfile) -> Result<(), StoreError> {
        Err(StoreError::new("injected store failure"))
    }

    async fn get_profile(&self, _user_id: &Uuid) -> Result<Option<UserProfile>, StoreError> {
        Err(StoreError::new("injected store failure"))
    }

    async fn update_profile(
        &self,
        _user_id: &Uuid,
        _update: &ProfileUpdate,
    ) -> Result<(), UpdateProfileError> {
        Err(UpdateProfileError::Store(StoreError::new(
            "injected store failure",
        )))
    }

    async fn list_profiles(&self, _page: &ProfilePage) -> Result<ProfileListing, StoreError> {
        Err(StoreError::new("injected store failure"))
    }

    async fn count_profiles(&self) -> Result<i64, StoreError> {
        Err(StoreError::new("injected store failure"))
    }

    async fn count_active_profiles(&self, _since: DateTime<Utc>) -> Result<i64, StoreError> {
        Err(StoreError::new("injected store failure"))
    }
}

#[derive(Default)]
pub(crate) struct InMemoryCourses {
    pub courses: Mutex<HashMap<Uuid, Course>>,
}

impl InMemoryCourses {
    pub fn with(courses: impl IntoIterator<Item = Course>) -> Self {
        InMemoryCourses {
            courses: Mutex::new(
                courses
                    .into_iter()
                    .map(|course| (course.course_id, course))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl CoursesRepository for InMemoryCourses {
    async fn create_course(&self, course: &Course) -> Result<(), StoreError> {
        let mut courses = self.courses.lock().unwrap();
        if courses.contains_key(&course.course_id) {
            return Err(StoreError::new("course already exists"));
        }
        courses.insert(course.course_id, course.clone());
        Ok(())
    }

    async fn get_course(&self, course_id: &Uuid) -> Result<Option<Course>, StoreError> {
        Ok(self.courses.lock().unwrap().get(course_id).cloned())
    }

    async fn list_courses(&self, filters: &CourseFilters) -> Result<Vec<Course>, StoreError> {
        let courses = self.courses.lock().unwrap();
        let mut matched: Vec<Course> = courses
            .values()
            .filter(|course| {
                filters
                    .teacher_id
                    .map_or(true, |teacher_id| course.teacher_id == teacher_id)
            })
            .filter(|course| {
                filters
                    .category
                    .as_ref()
                    .map_or(true, |category| &course.category == category)
            })
            .filter(|course| filters.level.map_or(true, |level| course.level == level))
            .filter(|course| {
                filters
                    .is_published
                    .map_or(true, |is_published| course.is_published == is_published)
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matched.truncate(filters.limit.unwrap_or(100) as usize);
        Ok(matched)
    }

    async fn list_all(&self) -> Result<Vec<Course>, StoreError> {
        Ok(self.courses.lock().unwrap().values().cloned().collect())
    }

    async fn update_course(
        &self,
        course_id: &Uuid,
        update: &CourseUpdate,
    ) -> Result<(), UpdateCourseError> {
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .get_mut(course_id)
            .ok_or(UpdateCourseError::NotFound)?;
        if let Some(title) = &update.title {
            course.title = title.clone();
        }
        if let Some(description) = &update.description {
            course.description = description.clone();
        }
        if let Some(thumbnail) = &update.thumbnail {
            course.thumbnail = Some(thumbnail.clone());
        }
        if let Some(category) = &update.category {
            course.category = category.clone();
        }
        if let Some(level) = update.level {
            course.level = level;
        }
        if let Some(duration) = &update.duration {
            course.duration = duration.clone();
        }
        if let Some(price) = update.price {
            course.price = price;
        }
        if let Some(is_published) = update.is_published {
            course.is_published = is_published;
        }
        course.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_course(&self, course_id: &Uuid) -> Result<(), StoreError> {
        self.courses.lock().unwrap().remove(course_id);
        Ok(())
    }

    async fn increment_students_enrolled(
        &self,
        course_id: &Uuid,
        delta: i64,
    ) -> Result<(), UpdateCourseError> {
        let mut courses = self.courses.lock().unwrap();
        let course = courses
            .get_mut(course_id)
            .ok_or(UpdateCourseError::NotFound)?;
        course.students_enrolled += delta;
        Ok(())
    }

    async fn batch_get_courses(
        &self,
        course_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Course>, StoreError> {
        let courses = self.courses.lock().unwrap();
        Ok(course_ids
            .iter()
            .filter_map(|course_id| {
                courses
                    .get(course_id)
                    .map(|course| (*course_id, course.clone()))
            })
            .collect())
    }

    async fn count_courses(&self) -> Result<i64, StoreError> {
        Ok(self.courses.lock().unwrap().len() as i64)
    }
}

#[derive(Default)]
pub(crate) struct InMemoryEnrollments {
    pub enrollments: Mutex<Vec<Enrollment>>,
}

impl InMemoryEnrollments {
    pub fn with(enrollments: impl IntoIterator<Item = Enrollment>) -> Self {
        InMemoryEnrollments {
            enrollments: Mutex::new(enrollments.into_iter().collect()),
        }
    }
}

#[async_trait]
impl EnrollmentsRepository for InMemoryEnrollments {
    async fn create_enrollment(&self, enrollment: &Enrollment) -> Result<(), CreateEnrollmentError> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let duplicate = enrollments.iter().any(|existing| {
            existing.course_id == enrollment.course_id
                && existing.student_id == enrollment.student_id
        });
        if duplicate {
            return Err(CreateEnrollmentError::AlreadyEnrolled);
        }
        enrollments.push(enrollment.clone());
        Ok(())
    }

    async fn get_enrollment(
        &self,
        enrollment_id: &Uuid,
    ) -> Result<Option<Enrollment>, StoreError> {
        Ok(self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .find(|enrollment| &enrollment.enrollment_id == enrollment_id)
            .cloned())
    }

    async fn list_for_student(&self, student_id: &Uuid) -> Result<Vec<Enrollment>, StoreError> {
        let mut matched: Vec<Enrollment> = self
            .enrollments
            .lock()
            .unwrap()
            .iter()
            .filter(|enrollment| &enrollment.student_id == student_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.enrolled_at.cmp(&b.enrolled_at));
        Ok(matched)
    }

    async fn list_all(&self) -> Result<Vec<Enrollment>, StoreError> {
        Ok(self.enrollments.lock().unwrap().clone())
    }

    async fn update_progress(
        &self,
        enrollment_id: &Uuid,
        update: &ProgressUpdate,
    ) -> Result<(), UpdateEnrollmentError> {
        let mut enrollments = self.enrollments.lock().unwrap();
        let enrollment = enrollments
            .iter_mut()
            .find(|enrollment| &enrollment.enrollment_id == enrollment_id)
            .ok_or(UpdateEnrollmentError::NotFound)?;
        enrollment.progress = update.progress;
        enrollment.completed_lessons = update.completed_lessons.clone();
        enrollment.last_accessed = Some(Utc::now());
        Ok(())
    }
}

pub(crate) struct FakeCredential {
    pub user_id: Uuid,
    pub password: String,
    pub display_name: String,
}

/// Identity provider keeping plaintext credentials in memory. Hashing is
/// covered by the password module's own tests.
#[derive(Default)]
pub(crate) struct FakeIdentityProvider {
    pub credentials: Mutex<HashMap<String, FakeCredential>>,
}

#[async_trait]
impl IdentityProvider for FakeIdentityProvider {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<ProviderIdentity, AuthError> {
        let mut credentials = self.credentials.lock().unwrap();
        if credentials.contains_key(email) {
            return Err(AuthError::DuplicateIdentity);
        }
        let user_id = Uuid::new_v4();
        credentials.insert(
            email.to_string(),
            FakeCredential {
                user_id,
                password: password.to_string(),
                display_name: display_name.to_string(),
            },
        );
        Ok(ProviderIdentity {
            user_id,
            email: email.to_string(),
            display_name: display_name.to_string(),
        })
    }

    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderIdentity, AuthError> {
        let credentials = self.credentials.lock().unwrap();
        let credential = credentials.get(email).ok_or(AuthError::IdentityNotFound)?;
        if credential.password != password {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(ProviderIdentity {
            user_id: credential.user_id,
            email: email.to_string(),
            display_name: credential.display_name.clone(),
        })
    }
}

#[derive(Default)]
pub(crate) struct InMemorySessions {
    pub tokens: Mutex<HashMap<String, Uuid>>,
}

impl SessionStore for InMemorySessions {
    fn put(&self, token: &Uuid, owner: &Uuid, _ttl_seconds: u32) -> Result<(), StoreError> {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), *owner);
        Ok(())
    }

    fn take(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        Ok(self.tokens.lock().unwrap().remove(token))
    }
}
