//! The four generation stages and their prompts

use super::config::PipelineSettings;
use super::context::{ContextKey, ExecutionContext};
use super::extractor::extract;
use super::naming::assign_default_names;
use super::stage::{Stage, StageResult};
use crate::llm::{BackendError, ChatMessage, LLMClient, LLMRequest};
use crate::service::ServiceDescriptor;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const GO_BLOCK_FORMAT: &str = "```go\n// file: <filename>\n<code>\n```";
const SQL_BLOCK_FORMAT: &str = "```sql\n-- file: <filename>\n<sql>\n```";

const API_DESIGN_RESPONSIBILITIES: &str = "\
- Design clean, RESTful API contracts tailored to this service's domain
- Define route structures and OpenAPI-style documentation
- Specify request/response schemas with proper validation rules
- Handle domain-specific edge cases and error scenarios
- Follow REST best practices and correct HTTP semantics";

const API_DESIGN_OUTPUT: &str = "\
When generating code, always include:

- Route definitions using Go's net/http or chi router
- Request/Response structs with JSON tags and validation
- Proper HTTP status codes and error response formats
- Comments explaining design decisions";

const API_DESIGN_DELIVERABLES: &str = "\
1. A complete list of API endpoints (HTTP method, path, description) for all operations listed above
2. Go structs for all request and response payloads with JSON tags
3. Router setup code (chi or net/http)
4. Standardized error response format
5. OpenAPI-style godoc comments for each endpoint
6. Any domain-specific validation rules or constraints";

const BACKEND_RESPONSIBILITIES: &str = "\
- Implement service layer business logic for all domain operations
- Design the database schema with proper indexing and constraints
- Write repository pattern code for data access using pgx or sqlx
- Handle concurrency: locking strategies, atomic updates, race conditions
- Implement database migrations (up/down)
- Apply domain-appropriate patterns (e.g. Saga, outbox, event sourcing)";

const BACKEND_OUTPUT: &str = "\
When generating code, always include:

- PostgreSQL schema (tables, indexes, constraints, foreign keys)
- Repository interfaces and concrete implementations
- Service structs with dependency injection
- Concurrency-safe operations where relevant
- Up/down migration SQL files";

const BACKEND_DELIVERABLES: &str = "\
1. PostgreSQL schema for all entities listed above (tables, indexes, constraints)
2. Repository interfaces and implementations using pgx
3. Service layer structs with all business operations implemented
4. Database migration files (up + down)
5. Any concurrency or consistency mechanisms needed for the operations above
6. Dependency injection wiring (how repos plug into services)";

const MESSAGING_RESPONSIBILITIES: &str = "\
- Design domain event schemas appropriate for this service
- Implement Kafka producers with the transactional outbox pattern
- Implement Kafka consumers with idempotency and dead letter queue handling
- Define which events this service publishes and which it consumes
- Ensure at-least-once delivery with retry and backoff logic
- Handle graceful shutdown of consumers";

const MESSAGING_OUTPUT: &str = "\
When generating code, always include:

- Domain event structs with versioning, event_id, correlation_id, and timestamp
- Kafka producer with transactional outbox (events written to DB before publishing)
- Kafka consumer group with idempotency tracking
- Dead letter queue handling
- Graceful shutdown";

const MESSAGING_DELIVERABLES: &str = "\
1. Domain event structs this service will PUBLISH (derived from its operations and entities)
2. Events this service will CONSUME from its integrations
3. Kafka producer implementation with:
   - Transactional outbox pattern
   - Exponential backoff retry
   - JSON serialization with schema versioning
4. Kafka consumer with:
   - Consumer group setup
   - Idempotency key tracking to prevent duplicate processing
   - Dead letter queue for poison messages
5. Event handler functions for each consumed event type
6. Topic naming conventions and configuration recommendations
7. Graceful shutdown logic";

const TESTING_RESPONSIBILITIES: &str = "\
- Write comprehensive unit tests using Go's testing package and testify
- Design table-driven tests covering edge cases for all domain operations
- Write integration tests using testcontainers-go for real dependencies
- Implement JWT authentication middleware with role-based access control
- Add rate limiting, request ID generation, and audit logging middleware
- Identify and test security vulnerabilities specific to this service's domain";

const TESTING_OUTPUT: &str = "\
When generating code, always include:

- Table-driven unit tests with mock repositories (using interfaces)
- Integration tests with testcontainers (PostgreSQL, Kafka as needed)
- Concurrency tests for any operations that modify shared state
- JWT middleware (RS256), RBAC roles appropriate to this service
- Rate limiter middleware (token bucket per IP/API key)
- Audit logging middleware for all mutating operations
- A Makefile with test targets and coverage reporting";

const TESTING_DELIVERABLES: &str = "\
1. Unit tests for the service layer, one test file per major operation
   - Table-driven tests with success and failure cases
   - Mock repositories generated from interfaces
   - Concurrency tests for any operations that mutate shared state
2. Integration tests using testcontainers-go
3. Security middleware stack:
   - JWT validation (RS256) with roles appropriate to this service
   - Role-based access control per endpoint
   - Rate limiter (token bucket, configurable per role)
   - Request ID + audit logging middleware for all mutations
4. Security-focused test cases:
   - Unauthorized access attempts
   - Input validation / injection attempts
   - Any domain-specific security concerns
5. Makefile with: test, test-integration, coverage, lint targets";

/// The closed set of generation stages, in their standard order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    ApiDesign,
    BackendDb,
    Messaging,
    TestingSecurity,
}

impl StageKind {
    pub const ALL: [StageKind; 4] = [
        StageKind::ApiDesign,
        StageKind::BackendDb,
        StageKind::Messaging,
        StageKind::TestingSecurity,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => "API Design Agent",
            StageKind::BackendDb => "Backend & Database Agent",
            StageKind::Messaging => "Messaging & Events Agent",
            StageKind::TestingSecurity => "Testing & Security Agent",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => {
                "Designs RESTful API contracts, route definitions, and request/response schemas"
            }
            StageKind::BackendDb => {
                "Implements business logic, service layer, and database schema/repositories"
            }
            StageKind::Messaging => {
                "Designs and implements Kafka-based domain events, producers, consumers, and async communication"
            }
            StageKind::TestingSecurity => {
                "Writes unit/integration tests and implements JWT auth, RBAC, rate limiting, and security middleware"
            }
        }
    }

    /// Prefix of default artifact names
    pub fn family(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => "api",
            StageKind::BackendDb => "service",
            StageKind::Messaging => "messaging",
            StageKind::TestingSecurity => "test",
        }
    }

    pub fn context_key(&self) -> ContextKey {
        match self {
            StageKind::ApiDesign => ContextKey::ApiDesign,
            StageKind::BackendDb => ContextKey::BackendDb,
            StageKind::Messaging => ContextKey::Messaging,
            StageKind::TestingSecurity => ContextKey::TestingSecurity,
        }
    }

    /// Prior context this stage folds into its prompt, with section labels
    pub fn reads(&self) -> &'static [(ContextKey, &'static str)] {
        match self {
            StageKind::ApiDesign => &[(ContextKey::Project, "Additional Context")],
            StageKind::BackendDb => &[(
                ContextKey::ApiDesign,
                "API Design (implement these contracts)",
            )],
            StageKind::Messaging => &[(
                ContextKey::BackendDb,
                "Database/Service Context (outbox table should align with this schema)",
            )],
            StageKind::TestingSecurity => &[
                (
                    ContextKey::ApiDesign,
                    "API Design (write tests and middleware for these endpoints)",
                ),
                (
                    ContextKey::BackendDb,
                    "Service/Repo Layer (mock these interfaces in tests)",
                ),
            ],
        }
    }

    fn responsibilities(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => API_DESIGN_RESPONSIBILITIES,
            StageKind::BackendDb => BACKEND_RESPONSIBILITIES,
            StageKind::Messaging => MESSAGING_RESPONSIBILITIES,
            StageKind::TestingSecurity => TESTING_RESPONSIBILITIES,
        }
    }

    fn output_format(&self) -> String {
        match self {
            StageKind::ApiDesign => format!(
                "{}\n\nFormat code blocks as:\n{}",
                API_DESIGN_OUTPUT, GO_BLOCK_FORMAT
            ),
            StageKind::BackendDb => format!(
                "{}\n\nFormat Go code blocks as:\n{}\n\nFormat SQL blocks as:\n{}",
                BACKEND_OUTPUT, GO_BLOCK_FORMAT, SQL_BLOCK_FORMAT
            ),
            StageKind::Messaging => format!(
                "{}\n\nFormat code blocks as:\n{}",
                MESSAGING_OUTPUT, GO_BLOCK_FORMAT
            ),
            StageKind::TestingSecurity => format!(
                "{}\n\nFormat code blocks as:\n{}",
                TESTING_OUTPUT, GO_BLOCK_FORMAT
            ),
        }
    }

    fn task_intro(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => "Design the REST API for the following microservice:",
            StageKind::BackendDb => {
                "Implement the backend service layer and database code for the following microservice:"
            }
            StageKind::Messaging => {
                "Design and implement the messaging/eventing layer for the following microservice:"
            }
            StageKind::TestingSecurity => {
                "Write tests and implement security for the following microservice:"
            }
        }
    }

    fn deliverables(&self) -> &'static str {
        match self {
            StageKind::ApiDesign => API_DESIGN_DELIVERABLES,
            StageKind::BackendDb => BACKEND_DELIVERABLES,
            StageKind::Messaging => MESSAGING_DELIVERABLES,
            StageKind::TestingSecurity => TESTING_DELIVERABLES,
        }
    }

    /// System instruction tailored to one service
    pub fn system_prompt(&self, descriptor: &ServiceDescriptor) -> String {
        format!(
            "You are an expert {role} specializing in {service} microservices written in {language}.\n\n\
             Service you are building: {service}\n\n\
             Your responsibilities:\n{responsibilities}\n\n\
             {output_format}",
            role = self.name(),
            service = descriptor.name,
            language = descriptor.language,
            responsibilities = self.responsibilities(),
            output_format = self.output_format(),
        )
    }

    /// User prompt for one run: the task, the service, then whatever prior
    /// context is available. Absent keys are skipped silently.
    pub fn task_prompt(&self, descriptor: &ServiceDescriptor, prior: &ExecutionContext) -> String {
        let mut prompt = format!(
            "{}\n\n{}\n\nPlease produce:\n\n{}",
            self.task_intro(),
            descriptor.render_prompt(),
            self.deliverables()
        );

        for (key, label) in self.reads() {
            if let Some(section) = prior.get(*key) {
                prompt.push_str("\n\n");
                prompt.push_str(label);
                prompt.push_str(":\n");
                prompt.push_str(section);
            }
        }

        prompt
    }
}

/// A [`StageKind`] bound to a generation client and one service descriptor
pub struct AgentStage {
    kind: StageKind,
    client: Arc<dyn LLMClient>,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl AgentStage {
    pub fn new(
        kind: StageKind,
        client: Arc<dyn LLMClient>,
        descriptor: &ServiceDescriptor,
        settings: &PipelineSettings,
    ) -> Self {
        Self {
            kind,
            client,
            system_prompt: kind.system_prompt(descriptor),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        }
    }

    pub fn kind(&self) -> StageKind {
        self.kind
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl Stage for AgentStage {
    fn name(&self) -> &str {
        self.kind.name()
    }

    async fn run(
        &self,
        cancel: &CancellationToken,
        descriptor: &ServiceDescriptor,
        prior: &ExecutionContext,
    ) -> Result<StageResult, BackendError> {
        let prompt = self.kind.task_prompt(descriptor, prior);
        debug!(
            stage = self.kind.name(),
            prompt_chars = prompt.chars().count(),
            "Sending stage prompt"
        );

        let request = LLMRequest::new(vec![ChatMessage::user(prompt)])
            .with_system(self.system_prompt.clone())
            .with_max_tokens(self.max_tokens)
            .with_temperature(self.temperature);

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(BackendError::Cancelled),
            result = self.client.chat(request) => result?,
        };

        let mut artifacts = extract(&response.content);
        assign_default_names(&mut artifacts, self.kind.family());

        debug!(
            stage = self.kind.name(),
            artifacts = artifacts.len(),
            response_ms = response.response_time.as_millis() as u64,
            "Extracted artifacts"
        );

        Ok(StageResult::new(self.kind.name(), response.content).with_artifacts(artifacts))
    }
}
