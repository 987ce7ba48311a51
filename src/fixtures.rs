//! Schema text fixtures shared by unit tests.

/// Two-field user model with a surrogate key and a unique column.
pub const USER_SCHEMA: &str = r#"
model User {
  id    Int    @id @auto
  email String @unique
}
"#;

/// Blog schema covering every field attribute and both relation kinds.
pub const BLOG_SCHEMA: &str = r#"
// Blog example
model User {
  id        Int      @id @auto
  email     String   @unique
  name      String
  age       Int?
  isActive  Boolean  @default(true)
  bio       String?
  createdAt DateTime @default(now())
  updatedAt DateTime @updatedAt
  posts     Post[]   @relation("UserPosts")
}

model Category {
  id   Int    @id @auto
  name String @unique
  slug String @unique
}

model Post {
  id         Int     @id @auto
  title      String
  content    String
  published  Boolean @default(false)
  views      Int     @default(0)
  status     String  @default("draft")
  rating     Float?
  authorId   Int
  categoryId Int?
  author     User[]  @relation("PostAuthor", fields: [authorId], references: [id])
}
"#;
