use std::fmt;

/// The concrete kind of an [`Entity`](crate::Entity).
///
/// Built-in kinds are a closed set so the codec can match on them
/// exhaustively. Structural kinds are recognized by shape or by the property
/// they appear under rather than by discriminator. Kinds registered by an
/// embedding application are carried as [`EntityKind::External`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKind {
    // Structural wrapper kinds
    Collection,
    Activity,
    MediaLink,
    Place,
    Mood,
    Address,

    // Discriminator-named kinds
    Application,
    Article,
    Audio,
    Badge,
    Binary,
    Bookmark,
    Comment,
    Device,
    Event,
    File,
    Game,
    Group,
    Image,
    Issue,
    Job,
    Note,
    Offer,
    Organization,
    Page,
    Person,
    Process,
    Product,
    Question,
    Review,
    Service,
    Task,
    Video,

    /// The generic entity: anonymous objects, unknown discriminators, and
    /// the fallback when a registered factory rejects its input.
    Object,

    /// A kind registered at runtime, named by its discriminator.
    External(String),
}

impl EntityKind {
    /// Every built-in kind that has a discriminator token.
    pub const BUILT_IN: &'static [EntityKind] = &[
        EntityKind::Collection,
        EntityKind::Activity,
        EntityKind::MediaLink,
        EntityKind::Place,
        EntityKind::Mood,
        EntityKind::Address,
        EntityKind::Application,
        EntityKind::Article,
        EntityKind::Audio,
        EntityKind::Badge,
        EntityKind::Binary,
        EntityKind::Bookmark,
        EntityKind::Comment,
        EntityKind::Device,
        EntityKind::Event,
        EntityKind::File,
        EntityKind::Game,
        EntityKind::Group,
        EntityKind::Image,
        EntityKind::Issue,
        EntityKind::Job,
        EntityKind::Note,
        EntityKind::Offer,
        EntityKind::Organization,
        EntityKind::Page,
        EntityKind::Person,
        EntityKind::Process,
        EntityKind::Product,
        EntityKind::Question,
        EntityKind::Review,
        EntityKind::Service,
        EntityKind::Task,
        EntityKind::Video,
    ];

    /// Returns the discriminator token for this kind, if it has one.
    pub fn as_token(&self) -> Option<&str> {
        let token = match self {
            EntityKind::Collection => "collection",
            EntityKind::Activity => "activity",
            EntityKind::MediaLink => "media-link",
            EntityKind::Place => "place",
            EntityKind::Mood => "mood",
            EntityKind::Address => "address",
            EntityKind::Application => "application",
            EntityKind::Article => "article",
            EntityKind::Audio => "audio",
            EntityKind::Badge => "badge",
            EntityKind::Binary => "binary",
            EntityKind::Bookmark => "bookmark",
            EntityKind::Comment => "comment",
            EntityKind::Device => "device",
            EntityKind::Event => "event",
            EntityKind::File => "file",
            EntityKind::Game => "game",
            EntityKind::Group => "group",
            EntityKind::Image => "image",
            EntityKind::Issue => "issue",
            EntityKind::Job => "job",
            EntityKind::Note => "note",
            EntityKind::Offer => "offer",
            EntityKind::Organization => "organization",
            EntityKind::Page => "page",
            EntityKind::Person => "person",
            EntityKind::Process => "process",
            EntityKind::Product => "product",
            EntityKind::Question => "question",
            EntityKind::Review => "review",
            EntityKind::Service => "service",
            EntityKind::Task => "task",
            EntityKind::Video => "video",
            EntityKind::Object => return None,
            EntityKind::External(token) => token,
        };
        Some(token)
    }

    /// Looks up a built-in kind by its discriminator token (ASCII case-insensitive).
    pub fn from_token(token: &str) -> Option<EntityKind> {
        Self::BUILT_IN
            .iter()
            .find(|kind| {
                kind.as_token()
                    .is_some_and(|known| known.eq_ignore_ascii_case(token))
            })
            .cloned()
    }

    /// True for the container kinds whose shape does not vary by discriminator.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EntityKind::Collection
                | EntityKind::Activity
                | EntityKind::MediaLink
                | EntityKind::Place
                | EntityKind::Mood
                | EntityKind::Address
        )
    }

    /// The discriminator a fresh builder of this kind starts with: its own
    /// token. The generic kind has none.
    pub(crate) fn default_object_type(&self) -> Option<String> {
        self.as_token().map(str::to_string)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token().unwrap_or("object"))
    }
}
