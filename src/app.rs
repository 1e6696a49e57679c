use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{AppConfig, DatabaseBackend};
use crate::database::models::{
    CalendarItem, Contact, ContentItem, Friend, KanbanBoard, Location, Measurement, Note, Picture, Skill, Sleep,
    TimeLineType, TodoItem, Vaccination, Video, VocabularyItem,
};
use crate::database::{DatabaseError, DatabaseManager, MemoryRecordStore, PgRecordStore, RecordStore};
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::observer::implementations::{
    AccessLevelValidator, AudienceResolver, AuditLog, CacheSync, PushNotificationObserver, TimelineProjector,
    WebNotificationObserver,
};
use crate::observer::{ObserverBox, ObserverPipeline};
use crate::services::tags::collect_tags;
use crate::services::{
    AccessService, Cache, CommentService, ContentService, FamilyService, GatewayPushNotifier, KanbanItemService,
    MemoryCache, NotificationService, ProgenyAccess, ProgenyService, PushNotifier, ServiceResult, StoreWebNotifier,
    TimelineService, UserAccessService, UserGroupService, UserInfoService, WebNotifier,
};

/// A content type served under `/api/<segment>`
pub trait Routed: ContentItem {
    const SEGMENT: &'static str;

    fn service(state: &AppState) -> &ContentService<Self>;
}

macro_rules! content_types {
    ($($field:ident: $ty:ty => $segment:literal),* $(,)?) => {
        pub struct ContentServices {
            $(pub $field: ContentService<$ty>,)*
        }

        impl ContentServices {
            fn new(
                store: &Arc<dyn RecordStore>,
                access: &AccessService,
                pipeline: &Arc<ObserverPipeline>,
                cache: &Arc<dyn Cache>,
            ) -> Self {
                Self {
                    $($field: ContentService::new(store.clone(), access.clone(), pipeline.clone(), cache.clone()),)*
                }
            }

            /// Distinct tags over every content type, or just `item_type`
            pub async fn tags(&self, access: &ProgenyAccess, item_type: Option<TimeLineType>) -> ServiceResult<Vec<String>> {
                let mut raw: Vec<String> = Vec::new();
                $(
                    if item_type.map_or(true, |t| t == <$ty as ContentItem>::ITEM_TYPE) {
                        raw.extend(self.$field.tags(access).await?);
                    }
                )*
                Ok(collect_tags(raw.iter().map(String::as_str)))
            }
        }

        $(
            impl Routed for $ty {
                const SEGMENT: &'static str = $segment;

                fn service(state: &AppState) -> &ContentService<Self> {
                    &state.content.$field
                }
            }
        )*

        fn content_routes() -> Router<AppState> {
            Router::new()$(.merge(handlers::content::routes::<$ty>()))*
        }
    };
}

content_types! {
    pictures: Picture => "pictures",
    videos: Video => "videos",
    calendar: CalendarItem => "calendar",
    vocabulary: VocabularyItem => "vocabulary",
    skills: Skill => "skills",
    friends: Friend => "friends",
    measurements: Measurement => "measurements",
    sleep: Sleep => "sleep",
    notes: Note => "notes",
    contacts: Contact => "contacts",
    vaccinations: Vaccination => "vaccinations",
    locations: Location => "locations",
    todos: TodoItem => "todos",
    kanban_boards: KanbanBoard => "kanban_boards",
}

/// Shared handler state. Every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn Cache>,
    pub pipeline: Arc<ObserverPipeline>,
    pub access: AccessService,
    pub progeny: ProgenyService,
    pub user_access: UserAccessService,
    pub timeline: TimelineService,
    pub notifications: NotificationService,
    pub users: UserInfoService,
    pub comments: CommentService,
    pub kanban_items: KanbanItemService,
    pub families: FamilyService,
    pub groups: UserGroupService,
    pub content: Arc<ContentServices>,
}

impl AppState {
    /// Wires services and the observer pipeline over an existing store. The
    /// notifiers are passed in so tests can record the calls.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn RecordStore>,
        push: Arc<dyn PushNotifier>,
        web: Arc<dyn WebNotifier>,
    ) -> Self {
        let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
        let access = AccessService::new(store.clone(), config.access.clone());
        let timeline = TimelineService::new(store.clone(), access.clone());
        let notifications = NotificationService::new(store.clone());
        let users = UserInfoService::new(store.clone());

        let mut pipeline = ObserverPipeline::new(config.notifications.detach_async_observers);
        pipeline.register_observer(ObserverBox::Sync(Box::new(AccessLevelValidator)));
        pipeline.register_observer(ObserverBox::Sync(Box::new(TimelineProjector::new(timeline.clone()))));
        pipeline.register_observer(ObserverBox::Sync(Box::new(CacheSync::new(cache.clone()))));
        pipeline.register_observer(ObserverBox::Sync(Box::new(AudienceResolver::new(store.clone()))));
        if config.security.enable_audit_logging {
            pipeline.register_observer(ObserverBox::Async(Arc::new(AuditLog)));
        }
        pipeline.register_observer(ObserverBox::Async(Arc::new(PushNotificationObserver::new(
            push.clone(),
            config.notifications.icon_url.clone(),
        ))));
        pipeline.register_observer(ObserverBox::Async(Arc::new(WebNotificationObserver::new(web.clone()))));
        let pipeline = Arc::new(pipeline);

        let content = Arc::new(ContentServices::new(&store, &access, &pipeline, &cache));
        let comments = CommentService::new(
            store.clone(),
            access.clone(),
            timeline.clone(),
            notifications.clone(),
            users.clone(),
            push,
            web,
            config.notifications.icon_url.clone(),
        );

        Self {
            progeny: ProgenyService::new(store.clone(), access.clone()),
            user_access: UserAccessService::new(store.clone(), access.clone()),
            kanban_items: KanbanItemService::new(store.clone(), access.clone()),
            families: FamilyService::new(store.clone(), access.clone()),
            groups: UserGroupService::new(store.clone(), access.clone()),
            config: Arc::new(config),
            store,
            cache,
            pipeline,
            access,
            timeline,
            notifications,
            users,
            comments,
            content,
        }
    }

    /// Opens the configured backend and uses the production notifiers
    pub async fn from_config(config: AppConfig) -> Result<Self, DatabaseError> {
        let store: Arc<dyn RecordStore> = match config.database.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("Using the in-memory record store; data is lost on restart");
                Arc::new(MemoryRecordStore::new())
            }
            DatabaseBackend::Postgres => {
                let pool = DatabaseManager::main_pool(&config.database).await?;
                DatabaseManager::install_schema(&pool).await?;
                Arc::new(PgRecordStore::new(pool, config.database.enable_query_logging))
            }
        };
        let push: Arc<dyn PushNotifier> = Arc::new(GatewayPushNotifier::new(store.clone(), &config.notifications));
        let web: Arc<dyn WebNotifier> = Arc::new(StoreWebNotifier::new(store.clone(), &config.notifications));
        Ok(Self::new(config, store, push, web))
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(content_routes())
        .merge(handlers::progeny::routes())
        .merge(handlers::access::routes())
        .merge(handlers::timeline::routes())
        .merge(handlers::comments::routes())
        .merge(handlers::kanban::routes())
        .merge(handlers::families::routes())
        .merge(handlers::groups::routes())
        .merge(handlers::notifications::routes())
        .merge(handlers::users::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(api)
        .layer(cors_layer(&state.config));
    if state.config.server.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router.with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.security.cors_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
